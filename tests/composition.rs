// Composition tests: training, persistence and scoring chained together.
//
// These exercise the full flow:
//   CSV -> split -> TF-IDF -> logistic regression -> artifact -> load -> score
// with temporary files under the system temp dir.

use std::path::PathBuf;

use toxiscan::model::logistic::ClassifierConfig;
use toxiscan::model::pipeline::Pipeline;
use toxiscan::scoring::{score, ScoreError, DEFAULT_THRESHOLD};
use toxiscan::training::dataset::TrainingExample;
use toxiscan::training::{self, TrainOptions};

const TOXIC: &[&str] = &[
    "free money now",
    "free money click here",
    "win free money cash",
    "get free money fast",
    "money money free cash",
    "claim your free money",
];

const NON_TOXIC: &[&str] = &[
    "have a nice day",
    "nice day at the park",
    "have a lovely nice day",
    "what a nice sunny day",
    "enjoy your day at the park",
    "lovely sunny walk in the park",
    "a nice walk",
    "sunny day again",
];

fn examples() -> Vec<TrainingExample> {
    TOXIC
        .iter()
        .map(|t| TrainingExample {
            text: t.to_string(),
            toxic: true,
        })
        .chain(NON_TOXIC.iter().map(|t| TrainingExample {
            text: t.to_string(),
            toxic: false,
        }))
        .collect()
}

fn options() -> TrainOptions {
    TrainOptions {
        test_fraction: 0.0,
        classifier: ClassifierConfig {
            max_iter: 2000,
            c: 10.0,
            tolerance: 1e-5,
        },
        ..TrainOptions::default()
    }
}

fn trained() -> Pipeline {
    training::train_on(&examples(), &options()).unwrap().pipeline
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("toxiscan-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================
// End-to-end verdicts
// ============================================================

#[test]
fn spam_is_flagged_and_greeting_is_not() {
    let pipeline = trained();

    let spam = score(&pipeline, "free money now", DEFAULT_THRESHOLD).unwrap();
    assert!(spam.is_toxic);
    assert!(spam.confidence > 0.5, "got {}", spam.confidence);

    let greeting = score(&pipeline, "have a nice day", DEFAULT_THRESHOLD).unwrap();
    assert!(!greeting.is_toxic);
    assert!(greeting.confidence < 0.3, "got {}", greeting.confidence);
}

#[test]
fn empty_text_is_rejected() {
    let pipeline = trained();
    assert_eq!(
        score(&pipeline, "", DEFAULT_THRESHOLD),
        Err(ScoreError::MissingInput)
    );
}

#[test]
fn probabilities_are_bounded_and_verdicts_consistent() {
    let pipeline = trained();
    let samples = [
        "free money",
        "nice park",
        "completely unrelated sentence",
        "!!!",
        "FREE MONEY NICE DAY",
        "money",
        "ünïcödé text",
    ];
    for text in samples {
        let p = pipeline.predict_probability(text);
        assert!((0.0..=1.0).contains(&p), "{text:?} -> {p}");
        let prediction = score(&pipeline, text, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(prediction.is_toxic, p > DEFAULT_THRESHOLD, "{text:?}");
    }
}

#[test]
fn scoring_is_idempotent() {
    let pipeline = trained();
    for text in ["free money now", "have a nice day", "anything"] {
        let a = score(&pipeline, text, DEFAULT_THRESHOLD).unwrap();
        let b = score(&pipeline, text, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
        assert_eq!(a.is_toxic, b.is_toxic);
    }
}

#[test]
fn training_reports_convergence() {
    let outcome = training::train_on(&examples(), &options()).unwrap();
    let fit = outcome.fit();
    assert!(fit.iterations <= 2000);
    assert!(fit.final_loss.is_finite());
    assert_eq!(outcome.train_size, TOXIC.len() + NON_TOXIC.len());
}

// ============================================================
// Persistence
// ============================================================

#[test]
fn saved_model_scores_identically_after_load() {
    let pipeline = trained();
    let path = temp_dir("roundtrip").join("model.json");
    pipeline.save(&path).unwrap();
    let loaded = Pipeline::load(&path).unwrap();

    for text in TOXIC.iter().chain(NON_TOXIC).copied().chain(["unseen", "x"]) {
        assert_eq!(
            pipeline.predict_probability(text).to_bits(),
            loaded.predict_probability(text).to_bits(),
            "Mismatch on {text:?}"
        );
    }

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn run_reads_csv_and_writes_artifact() {
    let dir = temp_dir("run");
    let data_path = dir.join("train.csv");
    let output_path = dir.join("nested").join("toxic_model.json");

    let mut csv = String::from("id,comment_text,toxic\n");
    for (i, e) in examples().iter().enumerate() {
        csv.push_str(&format!("r{i},\"{}\",{}\n", e.text, u8::from(e.toxic)));
    }
    // A row with missing text still counts as an example
    csv.push_str("blank,,0\n");
    std::fs::write(&data_path, csv).unwrap();

    let options = TrainOptions {
        data_path: data_path.clone(),
        output_path: output_path.clone(),
        test_fraction: 0.25,
        ..options()
    };
    let outcome = training::run(&options).unwrap();

    assert_eq!(outcome.train_size + outcome.test_size, examples().len() + 1);
    assert!(outcome.report.is_some());
    assert!(output_path.exists());
    assert!(Pipeline::load(&output_path).is_ok());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn run_with_missing_csv_fails() {
    let options = TrainOptions {
        data_path: std::env::temp_dir().join("toxiscan-no-such-data.csv"),
        ..options()
    };
    assert!(training::run(&options).is_err());
}
