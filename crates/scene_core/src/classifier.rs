use crate::display::{ArticleCase, DisplayText};
use crate::error::{Result, SceneError};
use crate::scene_image::SceneImage;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// One (label, confidence) pair from a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: String,
    /// Model confidence in [0,1].
    pub confidence: f32,
}

/// A pretrained scene model.
///
/// Implementations return observations ranked by descending confidence.
/// They are shared across detection threads and must not mutate after
/// construction.
pub trait SceneClassifier: Send + Sync {
    fn classify(&self, image: &SceneImage) -> Result<Vec<Observation>>;
}

/// Runs one classification and formats its top-ranked result.
pub fn classify_top(
    classifier: &dyn SceneClassifier,
    image: &SceneImage,
    case: ArticleCase,
) -> Result<DisplayText> {
    let ranked = classifier.classify(image)?;
    if let Some(top) = ranked.first() {
        tracing::debug!(
            "{}: top scene {} ({:.3}) of {} results",
            image.name(),
            top.label,
            top.confidence,
            ranked.len()
        );
    }
    DisplayText::from_ranked(&ranked, case)
}

/// Reads a labels file: one label per line, in model output order.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let labels: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(SceneError::model_load(format!(
            "labels file {} contains no labels",
            path.display()
        )));
    }
    Ok(labels)
}

/// Turns raw logits into the `top_k` most likely labels, best first.
///
/// Output indices with no matching label are named `class_{index}`.
pub fn rank_scores(logits: &[f32], labels: &[String], top_k: usize) -> Vec<Observation> {
    let probs = softmax(logits);
    let mut indexed: Vec<(usize, f32)> = probs.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    indexed.truncate(top_k);
    indexed
        .into_iter()
        .map(|(idx, confidence)| Observation {
            label: labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("class_{idx}")),
            confidence,
        })
        .collect()
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}
