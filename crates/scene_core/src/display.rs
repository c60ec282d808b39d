use crate::classifier::Observation;
use crate::error::{Result, SceneError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown while an inference call is outstanding.
pub const DETECTING_PLACEHOLDER: &str = "detecting scene...";

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// How the first letter of a label is matched against vowels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleCase {
    /// Only lowercase vowels pick "an"; "Elevator" gets "a".
    #[default]
    Lowercase,
    /// Case is folded first; "Elevator" gets "an".
    Insensitive,
}

/// Picks "a" or "an" for `label`. An empty label gets "a".
pub fn article_for(label: &str, case: ArticleCase) -> &'static str {
    let Some(first) = label.chars().next() else {
        return "a";
    };
    let first = match case {
        ArticleCase::Lowercase => first,
        ArticleCase::Insensitive => first.to_ascii_lowercase(),
    };
    if VOWELS.contains(&first) { "an" } else { "a" }
}

/// Whole-number percentage, truncated rather than rounded.
pub fn confidence_percent(confidence: f32) -> u32 {
    // `as` saturates: NaN and negatives become 0.
    (confidence * 100.0) as u32
}

/// The sentence describing the top-ranked scene, e.g. `87% it's a train_station`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText(String);

impl DisplayText {
    pub fn from_observation(observation: &Observation, case: ArticleCase) -> Self {
        Self(format!(
            "{}% it's {} {}",
            confidence_percent(observation.confidence),
            article_for(&observation.label, case),
            observation.label
        ))
    }

    /// Formats the first entry of a ranked list and ignores the rest.
    pub fn from_ranked(ranked: &[Observation], case: ArticleCase) -> Result<Self> {
        let top = ranked.first().ok_or(SceneError::EmptyResults)?;
        Ok(Self::from_observation(top, case))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the answer label currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnswerState {
    #[default]
    Idle,
    Detecting,
    Detected(DisplayText),
    Failed(String),
}

impl AnswerState {
    pub fn failed(err: &SceneError) -> Self {
        Self::Failed(format!("couldn't detect scene: {err}"))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Detecting => DETECTING_PLACEHOLDER,
            Self::Detected(text) => text.as_str(),
            Self::Failed(message) => message,
        }
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self, Self::Detecting)
    }
}
