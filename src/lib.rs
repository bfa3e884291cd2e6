// Toxiscan: bag-of-words toxicity classification
//
// This is the library root. Each module corresponds to one stage of the
// train -> persist -> serve pipeline.

pub mod config;
pub mod model;
pub mod output;
pub mod scoring;
pub mod status;
pub mod text;
pub mod toxicity;
pub mod training;
pub mod web;
