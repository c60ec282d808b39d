use crate::classifier::{Observation, SceneClassifier, load_labels, rank_scores};
use crate::config::ClassifierConfig;
use crate::error::{Result, SceneError};
use crate::preprocess::Preprocess;
use crate::scene_image::SceneImage;
use ndarray::CowArray;
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};
use std::sync::Arc;

/// GoogLeNet-Places (or any single-output ONNX classifier) on ONNX Runtime.
pub struct OnnxSceneClassifier {
    // Kept alive for as long as the session.
    _env: Arc<Environment>,
    session: Session,
    labels: Vec<String>,
    preprocess: Preprocess,
    top_k: usize,
}

impl OnnxSceneClassifier {
    pub fn new(cfg: &ClassifierConfig) -> Result<Self> {
        if !cfg.model_path.exists() {
            return Err(SceneError::model_load(format!(
                "model file missing: {}",
                cfg.model_path.display()
            )));
        }
        if !cfg.labels_path.exists() {
            return Err(SceneError::model_load(format!(
                "labels file missing: {}",
                cfg.labels_path.display()
            )));
        }

        let env = Environment::builder()
            .with_name("scene-spotter")
            .build()
            .map_err(|e| model_error("couldn't initialize ONNX Runtime", e))?
            .into_arc();
        let session = SessionBuilder::new(&env)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_model_from_file(&cfg.model_path))
            .map_err(|e| model_error(format!("couldn't open {}", cfg.model_path.display()), e))?;

        let labels = load_labels(&cfg.labels_path)?;
        tracing::info!(
            "loaded scene model {} with {} labels",
            cfg.model_path.display(),
            labels.len()
        );

        Ok(Self {
            _env: env,
            session,
            labels,
            preprocess: cfg.preprocess(),
            top_k: cfg.top_k.max(1),
        })
    }
}

impl SceneClassifier for OnnxSceneClassifier {
    fn classify(&self, image: &SceneImage) -> Result<Vec<Observation>> {
        let tensor = self.preprocess.to_tensor(image).into_dyn();
        let cow = CowArray::from(tensor.view());
        let input = Value::from_array(self.session.allocator(), &cow)
            .map_err(|e| SceneError::Inference(Box::new(e)))?;
        let outputs: Vec<Value> = self
            .session
            .run(vec![input])
            .map_err(|e| SceneError::Inference(Box::new(e)))?;
        let Some(first) = outputs.first() else {
            return Err(SceneError::Inference("model produced no outputs".into()));
        };
        let logits: OrtOwnedTensor<f32, _> = first
            .try_extract()
            .map_err(|e| SceneError::Inference(Box::new(e)))?;
        let scores: Vec<f32> = logits.view().iter().cloned().collect();
        Ok(rank_scores(&scores, &self.labels, self.top_k))
    }
}

fn model_error(reason: impl Into<String>, err: ort::OrtError) -> SceneError {
    SceneError::ModelLoad {
        reason: reason.into(),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_model_is_a_model_load_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let labels = dir.path().join("labels.txt");
        fs::write(&labels, "ocean\n")?;
        let cfg = ClassifierConfig {
            model_path: dir.path().join("missing.onnx"),
            labels_path: labels,
            ..ClassifierConfig::default()
        };
        let err = OnnxSceneClassifier::new(&cfg).err().expect("load must fail");
        assert!(matches!(err, SceneError::ModelLoad { .. }));
        assert!(err.is_integration_fault());
        Ok(())
    }

    #[test]
    fn missing_labels_is_a_model_load_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let model = dir.path().join("model.onnx");
        fs::write(&model, b"")?;
        let cfg = ClassifierConfig {
            model_path: model,
            labels_path: dir.path().join("missing.txt"),
            ..ClassifierConfig::default()
        };
        let err = OnnxSceneClassifier::new(&cfg).err().expect("load must fail");
        assert!(matches!(err, SceneError::ModelLoad { .. }));
        Ok(())
    }
}
