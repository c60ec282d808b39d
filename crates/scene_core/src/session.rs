use crate::detector::{Completion, SceneDetector};
use crate::display::AnswerState;
use crate::error::Result;
use crate::scene_image::{PickOutcome, SceneImage};
use std::sync::Arc;
use std::time::Duration;

/// The single screen's state: the current photo and what the label says.
///
/// All methods run on the UI thread. Background completions only reach
/// the label through [`SceneSession::refresh`].
pub struct SceneSession {
    detector: SceneDetector,
    image: Option<Arc<SceneImage>>,
    image_revision: u64,
    answer: AnswerState,
}

impl SceneSession {
    pub fn new(detector: SceneDetector) -> Self {
        Self {
            detector,
            image: None,
            image_revision: 0,
            answer: AnswerState::Idle,
        }
    }

    /// Replaces the displayed photo and starts detecting its scene.
    pub fn show(&mut self, image: SceneImage) {
        let image = Arc::new(image);
        self.image = Some(Arc::clone(&image));
        self.image_revision += 1;
        self.answer = AnswerState::Detecting;
        if let Err(err) = self.detector.submit(image) {
            tracing::error!("couldn't start scene detection: {err}");
            self.answer = AnswerState::failed(&err);
        }
    }

    /// Applies the picker result. Cancelling leaves everything untouched.
    pub fn handle_pick(&mut self, outcome: PickOutcome) -> Result<()> {
        match outcome {
            PickOutcome::Cancelled => {
                tracing::debug!("photo picker cancelled");
                Ok(())
            }
            PickOutcome::Selected(path) => match SceneImage::open(&path) {
                Ok(image) => {
                    tracing::info!("picked {}", path.display());
                    self.show(image);
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!("couldn't use picked photo: {err}");
                    self.answer = AnswerState::failed(&err);
                    Err(err)
                }
            },
        }
    }

    /// Applies a finished detection to the label. Returns true if it changed.
    pub fn refresh(&mut self) -> bool {
        match self.detector.poll() {
            Some(done) => {
                self.apply(done);
                true
            }
            None => false,
        }
    }

    /// Blocks until the newest detection finishes or `timeout` passes.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        match self.detector.wait(timeout) {
            Some(done) => {
                self.apply(done);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, done: Completion) {
        self.answer = match done.outcome {
            Ok(text) => {
                tracing::info!(
                    "request {}: {} -> {text} in {:.1?}",
                    done.id,
                    done.image_name,
                    done.elapsed
                );
                AnswerState::Detected(text)
            }
            Err(err) => {
                tracing::error!("request {}: scene detection failed: {err}", done.id);
                AnswerState::failed(&err)
            }
        };
    }

    pub fn image(&self) -> Option<&Arc<SceneImage>> {
        self.image.as_ref()
    }

    /// Bumped every time the displayed photo is replaced.
    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }
}
