// Scoring: turn one piece of text into a toxicity verdict.
//
// The verdict compares the raw probability against the threshold with a
// strict `>`, and only then rounds the probability for display. A
// probability of exactly the threshold is therefore never toxic.

use serde::Serialize;
use thiserror::Error;

use crate::toxicity::traits::ToxicityScorer;

/// Decision threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub is_toxic: bool,
    /// Toxicity probability rounded to 3 decimal places
    pub confidence: f64,
}

impl Prediction {
    /// Build a verdict from a raw probability.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        Self {
            is_toxic: probability > threshold,
            confidence: round_confidence(probability),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("No content provided")]
    MissingInput,
}

/// Score `text`. Empty text is rejected before the scorer is consulted.
pub fn score(
    scorer: &dyn ToxicityScorer,
    text: &str,
    threshold: f64,
) -> Result<Prediction, ScoreError> {
    if text.is_empty() {
        return Err(ScoreError::MissingInput);
    }
    let probability = scorer.probability(text);
    Ok(Prediction::from_probability(probability, threshold))
}

/// Round to 3 decimal places.
pub fn round_confidence(probability: f64) -> f64 {
    (probability * 1000.0).round() / 1000.0
}
