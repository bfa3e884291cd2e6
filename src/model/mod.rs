// Model: logistic regression classifier and the persisted training pipeline.

pub mod logistic;
pub mod pipeline;
