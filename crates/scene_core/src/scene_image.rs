use crate::error::{Result, SceneError};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Name of the image shown and classified at startup.
pub const DEFAULT_SCENE: &str = "train_night";

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A decoded photo ready to be shown and classified.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneImage {
    name: String,
    pixels: RgbaImage,
}

/// What the photo picker handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Cancelled,
    Selected(PathBuf),
}

impl SceneImage {
    /// Converts a decoded image to RGBA. Fails on images with no pixels.
    pub fn from_dynamic(name: impl Into<String>, image: DynamicImage) -> Result<Self> {
        let name = name.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(SceneError::Conversion {
                name,
                reason: format!("image is {}x{}", image.width(), image.height()),
            });
        }
        Ok(Self {
            name,
            pixels: image.to_rgba8(),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| SceneError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(
            "decoded {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Self::from_dynamic(name, decoded)
    }

    /// Loads the asset called `name` from `dir`, trying each supported extension.
    pub fn load_bundled(dir: &Path, name: &str) -> Result<Self> {
        let path = find_bundled(dir, name).ok_or_else(|| SceneError::AssetMissing {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        })?;
        Self::open(&path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

pub fn find_bundled(dir: &Path, name: &str) -> Option<PathBuf> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}
