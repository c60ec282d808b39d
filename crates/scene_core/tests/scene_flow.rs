use image::{DynamicImage, ImageBuffer, Rgb};
use scene_core::{
    AnswerState, ArticleCase, DETECTING_PLACEHOLDER, Observation, PickOutcome, SceneClassifier,
    SceneDetector, SceneError, SceneImage, SceneSession,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);

/// Answers with a fixed ranking for every image.
struct Ranked(Vec<Observation>);

impl SceneClassifier for Ranked {
    fn classify(&self, _image: &SceneImage) -> scene_core::Result<Vec<Observation>> {
        Ok(self.0.clone())
    }
}

/// Names the scene after the image, holding back images called "slow"
/// until released.
struct Gated {
    release: Mutex<Receiver<()>>,
}

impl Gated {
    fn new() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                release: Mutex::new(rx),
            },
            tx,
        )
    }
}

impl SceneClassifier for Gated {
    fn classify(&self, image: &SceneImage) -> scene_core::Result<Vec<Observation>> {
        if image.name() == "slow" {
            let rx = self.release.lock().expect("gate lock");
            let _ = rx.recv_timeout(WAIT);
        }
        Ok(vec![Observation {
            label: format!("{}_scene", image.name()),
            confidence: 0.9,
        }])
    }
}

struct Failing;

impl SceneClassifier for Failing {
    fn classify(&self, _image: &SceneImage) -> scene_core::Result<Vec<Observation>> {
        Err(SceneError::Inference("backend exploded".into()))
    }
}

fn obs(label: &str, confidence: f32) -> Observation {
    Observation {
        label: label.to_string(),
        confidence,
    }
}

fn photo(name: &str) -> SceneImage {
    let buf = ImageBuffer::from_pixel(6, 4, Rgb([90, 60, 30]));
    SceneImage::from_dynamic(name, DynamicImage::ImageRgb8(buf)).expect("non-empty image")
}

fn session_with(classifier: impl SceneClassifier + 'static) -> SceneSession {
    SceneSession::new(SceneDetector::new(
        Arc::new(classifier),
        ArticleCase::Lowercase,
    ))
}

#[test]
fn startup_image_shows_placeholder_then_top_scene() -> Result<(), Box<dyn std::error::Error>> {
    let assets = tempdir()?;
    photo("unused")
        .pixels()
        .save(assets.path().join("train_night.png"))?;

    let mut session = session_with(Ranked(vec![
        obs("train_station", 0.87),
        obs("airport_terminal", 0.10),
    ]));
    assert_eq!(session.answer(), &AnswerState::Idle);

    session.show(SceneImage::load_bundled(assets.path(), "train_night")?);
    assert_eq!(session.answer().text(), DETECTING_PLACEHOLDER);
    assert_eq!(
        session.image().map(|i| i.name().to_string()),
        Some("train_night.png".to_string())
    );

    assert!(session.settle(WAIT));
    assert_eq!(session.answer().text(), "87% it's a train_station");
    Ok(())
}

#[test]
fn vowel_label_uses_an() {
    let mut session = session_with(Ranked(vec![obs("elevator_interior", 0.42)]));
    session.show(photo("lift"));
    assert!(session.settle(WAIT));
    assert_eq!(session.answer().text(), "42% it's an elevator_interior");
}

#[test]
fn cancelled_pick_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with(Ranked(vec![obs("train_station", 0.87)]));
    session.show(photo("first"));
    assert!(session.settle(WAIT));
    let revision = session.image_revision();
    let answer = session.answer().clone();

    session.handle_pick(PickOutcome::Cancelled)?;

    assert_eq!(session.image_revision(), revision);
    assert_eq!(session.image().map(|i| i.name()), Some("first"));
    assert_eq!(session.answer(), &answer);
    // Nothing was submitted, so nothing can complete.
    assert!(!session.settle(Duration::from_millis(200)));
    Ok(())
}

#[test]
fn picked_file_replaces_image_and_is_classified() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("beach.jpg");
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(10, 10, Rgb([0, 120, 200]))).save(&path)?;

    let mut session = session_with(Ranked(vec![obs("ocean", 0.999)]));
    session.show(photo("first"));
    assert!(session.settle(WAIT));
    let before = session.image_revision();

    session.handle_pick(PickOutcome::Selected(path))?;
    assert!(session.image_revision() > before);
    assert_eq!(session.image().map(|i| i.name()), Some("beach.jpg"));
    assert!(session.answer().is_detecting());

    assert!(session.settle(WAIT));
    assert_eq!(session.answer().text(), "99% it's an ocean");
    Ok(())
}

#[test]
fn undecodable_pick_keeps_image_and_reports() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png")?;

    let mut session = session_with(Ranked(vec![obs("ocean", 0.5)]));
    session.show(photo("first"));
    assert!(session.settle(WAIT));
    let revision = session.image_revision();

    let err = session
        .handle_pick(PickOutcome::Selected(path))
        .unwrap_err();
    assert!(matches!(err, SceneError::ImageDecode { .. }));
    assert_eq!(session.image_revision(), revision);
    assert!(
        session
            .answer()
            .text()
            .starts_with("couldn't detect scene: couldn't decode image")
    );
    Ok(())
}

#[test]
fn newer_pick_wins_over_slower_older_one() {
    let (classifier, release) = Gated::new();
    let mut session = session_with(classifier);

    session.show(photo("slow"));
    session.show(photo("fast"));
    assert!(session.settle(WAIT));
    assert_eq!(session.answer().text(), "90% it's a fast_scene");

    release.send(()).expect("slow request still waiting");
    // The slow result arrives now and must be discarded.
    assert!(!session.settle(Duration::from_millis(500)));
    assert!(!session.refresh());
    assert_eq!(session.answer().text(), "90% it's a fast_scene");
    assert_eq!(session.image().map(|i| i.name()), Some("fast"));
}

#[test]
fn inference_failure_replaces_placeholder() {
    let mut session = session_with(Failing);
    session.show(photo("any"));
    assert!(session.answer().is_detecting());
    assert!(session.settle(WAIT));
    assert_eq!(
        session.answer().text(),
        "couldn't detect scene: inference failed: backend exploded"
    );
}

#[test]
fn empty_ranking_is_reported_not_formatted() {
    let mut session = session_with(Ranked(Vec::new()));
    session.show(photo("any"));
    assert!(session.settle(WAIT));
    assert_eq!(
        session.answer(),
        &AnswerState::Failed("couldn't detect scene: classifier returned no results".into())
    );
}
