// Unit tests for the verdict logic.
//
// Tests isolated pure functions: Prediction::from_probability boundary
// conditions, round_confidence, and score() against fixed scorers.

use toxiscan::scoring::{round_confidence, score, Prediction, ScoreError, DEFAULT_THRESHOLD};
use toxiscan::toxicity::traits::FixedScorer;

// ============================================================
// Prediction::from_probability: boundary conditions
// ============================================================

#[test]
fn exact_threshold_is_not_toxic() {
    assert!(!Prediction::from_probability(0.3, 0.3).is_toxic);
}

#[test]
fn just_above_threshold_is_toxic() {
    assert!(Prediction::from_probability(0.3000001, 0.3).is_toxic);
}

#[test]
fn just_below_threshold_is_not_toxic() {
    assert!(!Prediction::from_probability(0.2999999, 0.3).is_toxic);
}

#[test]
fn zero_threshold_flags_any_positive_probability() {
    assert!(Prediction::from_probability(0.0001, 0.0).is_toxic);
    assert!(!Prediction::from_probability(0.0, 0.0).is_toxic);
}

#[test]
fn threshold_of_one_never_flags() {
    assert!(!Prediction::from_probability(1.0, 1.0).is_toxic);
}

#[test]
fn default_threshold_is_point_three() {
    assert_eq!(DEFAULT_THRESHOLD, 0.3);
}

// ============================================================
// round_confidence
// ============================================================

#[test]
fn confidence_keeps_three_decimals() {
    assert_eq!(round_confidence(0.4567), 0.457);
    assert_eq!(round_confidence(0.0004), 0.0);
    assert_eq!(round_confidence(1.0), 1.0);
}

#[test]
fn confidence_stays_in_unit_interval() {
    for i in 0..=1000 {
        let p = i as f64 / 1000.0;
        let c = round_confidence(p);
        assert!((0.0..=1.0).contains(&c), "{p} -> {c}");
    }
}

// ============================================================
// score()
// ============================================================

#[test]
fn score_verdict_matches_probability_across_range() {
    for i in 0..=100 {
        let p = i as f64 / 100.0;
        let prediction = score(&FixedScorer(p), "text", DEFAULT_THRESHOLD).unwrap();
        assert_eq!(prediction.is_toxic, p > DEFAULT_THRESHOLD, "p = {p}");
    }
}

#[test]
fn score_rejects_empty_text() {
    assert_eq!(
        score(&FixedScorer(0.9), "", DEFAULT_THRESHOLD),
        Err(ScoreError::MissingInput)
    );
}

#[test]
fn prediction_serializes_with_api_field_names() {
    let prediction = Prediction::from_probability(0.8, 0.3);
    let json = serde_json::to_value(prediction).unwrap();
    assert_eq!(json, serde_json::json!({ "is_toxic": true, "confidence": 0.8 }));
}
