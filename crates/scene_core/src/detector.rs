//! Background scene detection with results handed back to the UI thread.
//!
//! Every [`SceneDetector::submit`] runs one classification on its own thread.
//! Completions are queued on a channel and only become visible through
//! [`SceneDetector::poll`], which the UI calls from its own thread. A
//! completion for anything but the newest submission is dropped, so a slow
//! earlier pick can never overwrite a later one.

use crate::classifier::{SceneClassifier, classify_top};
use crate::display::{ArticleCase, DisplayText};
use crate::error::{Result, SceneError};
use crate::scene_image::SceneImage;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

pub type RequestId = u64;

/// Called from the worker thread once a completion has been queued.
pub type WakeHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub image_name: String,
    pub outcome: Result<DisplayText>,
    pub elapsed: Duration,
}

pub struct SceneDetector {
    classifier: Arc<dyn SceneClassifier>,
    article_case: ArticleCase,
    wake: WakeHook,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    next_id: RequestId,
    latest: Option<RequestId>,
}

impl SceneDetector {
    pub fn new(classifier: Arc<dyn SceneClassifier>, article_case: ArticleCase) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            classifier,
            article_case,
            wake: Arc::new(|| {}),
            tx,
            rx,
            next_id: 0,
            latest: None,
        }
    }

    pub fn with_wake_hook(mut self, wake: WakeHook) -> Self {
        self.wake = wake;
        self
    }

    /// Starts classifying `image` and returns the id of the new request.
    ///
    /// Any request still running is superseded; its result will be dropped.
    pub fn submit(&mut self, image: Arc<SceneImage>) -> Result<RequestId> {
        let id = self.next_id;
        self.next_id += 1;
        self.latest = Some(id);

        let classifier = Arc::clone(&self.classifier);
        let case = self.article_case;
        let tx = self.tx.clone();
        let wake = Arc::clone(&self.wake);
        tracing::debug!("request {id}: detecting scene in {}", image.name());

        thread::Builder::new()
            .name(format!("scene-detect-{id}"))
            .spawn(move || {
                let start = Instant::now();
                let outcome = classify_top(classifier.as_ref(), &image, case);
                let completion = Completion {
                    id,
                    image_name: image.name().to_string(),
                    outcome,
                    elapsed: start.elapsed(),
                };
                // The receiver is gone once the detector is dropped.
                if tx.send(completion).is_ok() {
                    wake();
                }
            })
            .map_err(SceneError::Spawn)?;
        Ok(id)
    }

    /// Id of the newest submission, if any.
    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    /// Returns the completion for the newest request once it has arrived.
    /// Never blocks.
    pub fn poll(&mut self) -> Option<Completion> {
        let mut current = None;
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(c) = self.accept(completion) {
                current = Some(c);
            }
        }
        current
    }

    /// Blocks until the newest request completes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<Completion> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if let Some(c) = self.accept(completion) {
                        return Some(c);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }

    fn accept(&self, completion: Completion) -> Option<Completion> {
        if Some(completion.id) == self.latest {
            Some(completion)
        } else {
            tracing::debug!(
                "request {}: dropping superseded result for {}",
                completion.id,
                completion.image_name
            );
            None
        }
    }
}
