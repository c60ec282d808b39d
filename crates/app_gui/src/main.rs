mod app;

use anyhow::{Context, Result};
use app::UiApp;
use directories_next::ProjectDirs;
use eframe::{NativeOptions, egui};
use scene_core::{AppConfig, CONFIG_FILE_NAME, SceneClassifier, SceneImage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const APP_VERSION: &str = env!("SCENE_SPOTTER_VERSION");

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("SceneSpotter stopped: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config_path = config_path();
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;

    let classifier = load_classifier(&config)?;
    let startup = SceneImage::load_bundled(&config.assets.dir, &config.assets.default_image)
        .context("loading startup image")?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 640.0]),
        ..Default::default()
    };
    let title = format!("SceneSpotter {APP_VERSION}");
    let article_case = config.display.article_case;
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(UiApp::new(
                cc,
                classifier,
                article_case,
                startup,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))
}

fn config_path() -> PathBuf {
    match ProjectDirs::from("app", "SceneSpotter", "SceneSpotter") {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

#[cfg(feature = "onnx")]
fn load_classifier(config: &AppConfig) -> Result<Arc<dyn SceneClassifier>> {
    let classifier = scene_core::OnnxSceneClassifier::new(&config.classifier)
        .context("loading scene model")?;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(_config: &AppConfig) -> Result<Arc<dyn SceneClassifier>> {
    anyhow::bail!("built without an inference backend; enable the `onnx` feature")
}
