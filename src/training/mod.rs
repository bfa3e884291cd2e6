// Training: load labeled comments, fit the pipeline, evaluate, save.
//
// The flow mirrors a one-shot batch job: read the CSV once, hold out a seeded
// test split, fit vectorizer + classifier on the rest, report metrics on the
// held-out rows against the configured threshold, then write the artifact.

pub mod dataset;
pub mod report;
pub mod split;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::model::logistic::{ClassifierConfig, FitReport};
use crate::model::pipeline::Pipeline;
use crate::scoring::DEFAULT_THRESHOLD;
use crate::text::vectorizer::VectorizerConfig;
use dataset::{Columns, TrainingExample};
use report::ClassificationReport;

/// Everything the `train` command needs.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    pub columns: Columns,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
    /// Fraction of examples held out for evaluation
    pub test_fraction: f64,
    pub seed: u64,
    /// Probability above which an evaluation row counts as predicted toxic
    pub threshold: f64,
    /// Show a spinner while the classifier fits
    pub show_progress: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("train.csv"),
            output_path: PathBuf::from("toxic_model.json"),
            columns: Columns::default(),
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
            test_fraction: 0.2,
            seed: 42,
            threshold: DEFAULT_THRESHOLD,
            show_progress: false,
        }
    }
}

/// What a training run produced.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub pipeline: Pipeline,
    pub train_size: usize,
    pub test_size: usize,
    /// `None` when the test fraction is zero
    pub report: Option<ClassificationReport>,
}

impl TrainingOutcome {
    pub fn fit(&self) -> &FitReport {
        &self.pipeline.metadata().fit
    }
}

/// Load the CSV at `options.data_path`, train, evaluate and save.
pub fn run(options: &TrainOptions) -> Result<TrainingOutcome> {
    let examples = dataset::load_csv(&options.data_path, &options.columns)?;
    let outcome = train_on(&examples, options)?;
    outcome.pipeline.save(&options.output_path)?;
    Ok(outcome)
}

/// Train and evaluate on in-memory examples without touching disk.
pub fn train_on(examples: &[TrainingExample], options: &TrainOptions) -> Result<TrainingOutcome> {
    if examples.is_empty() {
        anyhow::bail!("No training examples: the dataset is empty");
    }

    let (train, test) = split::train_test_split(examples, options.test_fraction, options.seed)?;
    info!(
        train = train.len(),
        test = test.len(),
        seed = options.seed,
        "Split dataset"
    );

    let texts: Vec<&str> = train.iter().map(|e| e.text.as_str()).collect();
    let labels: Vec<bool> = train.iter().map(|e| e.toxic).collect();

    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {msg} [{elapsed}]")
                .expect("valid template"),
        );
        pb.set_message(format!("Training on {} examples...", train.len()));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    } else {
        ProgressBar::hidden()
    };

    let fitted = Pipeline::fit(
        options.vectorizer.clone(),
        options.classifier.clone(),
        &texts,
        &labels,
    );
    spinner.finish_and_clear();
    let pipeline = fitted?;

    let report = if test.is_empty() {
        None
    } else {
        let actual: Vec<bool> = test.iter().map(|e| e.toxic).collect();
        let predicted: Vec<bool> = test
            .iter()
            .map(|e| pipeline.predict_probability(&e.text) > options.threshold)
            .collect();
        Some(ClassificationReport::compute(&actual, &predicted))
    };

    let fit = &pipeline.metadata().fit;
    info!(
        iterations = fit.iterations,
        converged = fit.converged,
        accuracy = report.as_ref().map(|r| r.accuracy),
        "Training finished"
    );

    Ok(TrainingOutcome {
        pipeline,
        train_size: train.len(),
        test_size: test.len(),
        report,
    })
}
