//! Scene detection for a single photo: load an image, run a pretrained
//! places classifier on a background thread, and describe the top result
//! as a sentence like `87% it's a train_station`.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod display;
pub mod error;
#[cfg(feature = "ort")]
pub mod onnx;
pub mod preprocess;
pub mod scene_image;
pub mod session;

pub use classifier::{Observation, SceneClassifier, classify_top};
pub use config::{AppConfig, AssetConfig, CONFIG_FILE_NAME, ClassifierConfig, DisplayConfig};
pub use detector::{Completion, RequestId, SceneDetector, WakeHook};
pub use display::{AnswerState, ArticleCase, DETECTING_PLACEHOLDER, DisplayText};
pub use error::{Result, SceneError};
#[cfg(feature = "ort")]
pub use onnx::OnnxSceneClassifier;
pub use scene_image::{DEFAULT_SCENE, PickOutcome, SceneImage};
pub use session::SceneSession;
