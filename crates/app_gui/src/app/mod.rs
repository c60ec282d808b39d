mod picker;

use eframe::{App, CreationContext, Frame, egui};
use picker::PhotoPicker;
use scene_core::{ArticleCase, SceneClassifier, SceneDetector, SceneImage, SceneSession};
use std::sync::Arc;

pub(crate) struct UiApp {
    session: SceneSession,
    picker: PhotoPicker,
    texture: Option<egui::TextureHandle>,
    texture_revision: u64,
}

impl UiApp {
    pub(crate) fn new(
        cc: &CreationContext<'_>,
        classifier: Arc<dyn SceneClassifier>,
        article_case: ArticleCase,
        startup: SceneImage,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let detector = SceneDetector::new(classifier, article_case)
            .with_wake_hook(Arc::new(move || ctx.request_repaint()));
        let mut session = SceneSession::new(detector);
        session.show(startup);
        Self {
            session,
            picker: PhotoPicker::new(),
            texture: None,
            texture_revision: 0,
        }
    }

    fn scene_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.texture_revision != self.session.image_revision() {
            self.texture = self.session.image().map(|image| {
                let size = [image.width() as usize, image.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, image.pixels().as_raw());
                ctx.load_texture(
                    format!("scene:{}", image.name()),
                    color,
                    egui::TextureOptions::LINEAR,
                )
            });
            self.texture_revision = self.session.image_revision();
        }
        self.texture.as_ref()
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.session.refresh();

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading(self.session.answer().text());
                ui.add_space(8.0);
                if ui.button("Pick image").clicked() {
                    // Decode failures are already shown in the label.
                    let _ = self.session.handle_pick(self.picker.pick());
                }
            });
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            match self.scene_texture(ctx) {
                Some(texture) => {
                    let sized = egui::load::SizedTexture::from_handle(texture);
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::from_texture(sized).max_size(available));
                    });
                }
                None => {
                    ui.centered_and_justified(|ui| ui.label("No image"));
                }
            }
        });
    }
}
