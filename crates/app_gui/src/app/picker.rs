//! Native photo picker, opened in the user's Pictures folder.

use directories_next::UserDirs;
use rfd::FileDialog;
use scene_core::PickOutcome;
use scene_core::scene_image::supported_extensions;
use std::path::PathBuf;

pub(crate) struct PhotoPicker {
    start_dir: Option<PathBuf>,
}

impl PhotoPicker {
    pub(crate) fn new() -> Self {
        Self {
            start_dir: pictures_dir(),
        }
    }

    /// Blocks until the user picks a photo or closes the dialog.
    pub(crate) fn pick(&self) -> PickOutcome {
        let mut dialog = FileDialog::new()
            .set_title("Pick a photo")
            .add_filter("Images", supported_extensions());
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }
        match dialog.pick_file() {
            Some(path) => PickOutcome::Selected(path),
            None => PickOutcome::Cancelled,
        }
    }
}

fn pictures_dir() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    dirs.picture_dir().map(|p| p.to_path_buf())
}
