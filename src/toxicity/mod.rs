// Toxicity scoring: trait-based abstraction over the probability source.
//
// The ToxicityScorer trait is the seam between the HTTP layer and the
// trained model. The service holds an `Arc<dyn ToxicityScorer>`, so tests
// can swap in a fixed-probability scorer without training anything.

pub mod traits;
