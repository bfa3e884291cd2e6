// Toxicity scorer trait.
//
// The production implementation is the trained `Pipeline`. Scoring is a
// pure CPU computation over immutable state, so the trait is synchronous
// and implementations must be shareable across request handlers.

/// Anything that can turn text into a toxicity probability.
pub trait ToxicityScorer: Send + Sync {
    /// Probability in [0, 1] that `text` is toxic.
    fn probability(&self, text: &str) -> f64;
}

/// Scorer that returns the same probability for every text.
///
/// Useful for exercising threshold and transport behavior in isolation.
pub struct FixedScorer(pub f64);

impl ToxicityScorer for FixedScorer {
    fn probability(&self, _text: &str) -> f64 {
        self.0
    }
}
