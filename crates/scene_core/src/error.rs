use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = SceneError> = std::result::Result<T, E>;

/// Every fallible step between picking a photo and showing its scene.
///
/// The library never decides what is fatal. Startup code treats asset, model
/// and config failures as misconfiguration, while the UI shows the rest in
/// the answer label.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("bundled image `{name}` not found in {}", dir.display())]
    AssetMissing { name: String, dir: PathBuf },

    #[error("couldn't decode image {}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("couldn't convert image `{name}`: {reason}")]
    Conversion { name: String, reason: String },

    #[error("couldn't load scene model: {reason}")]
    ModelLoad {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("classifier returned no results")]
    EmptyResults,

    #[error("inference failed: {0}")]
    Inference(#[source] BoxError),

    #[error("invalid config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("couldn't read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't start detection thread")]
    Spawn(#[source] std::io::Error),
}

impl SceneError {
    pub fn model_load(reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            reason: reason.into(),
            source: None,
        }
    }

    /// True for errors that can only come from a broken build or install.
    pub fn is_integration_fault(&self) -> bool {
        matches!(
            self,
            Self::AssetMissing { .. } | Self::ModelLoad { .. } | Self::Config { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_missing_names_asset_and_dir() {
        let err = SceneError::AssetMissing {
            name: "train_night".into(),
            dir: PathBuf::from("assets"),
        };
        assert_eq!(
            err.to_string(),
            "bundled image `train_night` not found in assets"
        );
        assert!(err.is_integration_fault());
    }

    #[test]
    fn runtime_faults_are_not_integration_faults() {
        assert!(!SceneError::EmptyResults.is_integration_fault());
        assert!(!SceneError::Inference("boom".into()).is_integration_fault());
    }
}
