// Labeled training data loaded from CSV.
//
// The expected layout is the Jigsaw toxic-comment format: a header row with
// at least a text column (`comment_text`) and a 0/1 label column (`toxic`).
// Any other columns are ignored. Empty text cells become empty strings; an
// empty or unparseable label is an error.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// One labeled comment.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub text: String,
    pub toxic: bool,
}

/// Names of the two columns the loader reads.
#[derive(Debug, Clone)]
pub struct Columns {
    pub text: String,
    pub label: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            text: "comment_text".to_string(),
            label: "toxic".to_string(),
        }
    }
}

/// Load examples from a CSV file on disk.
pub fn load_csv(path: &Path, columns: &Columns) -> Result<Vec<TrainingExample>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open training data {}", path.display()))?;
    let examples = read_csv(file, columns)
        .with_context(|| format!("Failed to parse training data {}", path.display()))?;
    info!(
        path = %path.display(),
        examples = examples.len(),
        toxic = examples.iter().filter(|e| e.toxic).count(),
        "Loaded training data"
    );
    Ok(examples)
}

/// Parse examples from any CSV source.
pub fn read_csv<R: Read>(reader: R, columns: &Columns) -> Result<Vec<TrainingExample>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("Required column {name:?} not found in CSV header"))
    };
    let text_idx = find(&columns.text)?;
    let label_idx = find(&columns.label)?;

    let mut examples = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = i + 2;
        let record = record.with_context(|| format!("Malformed CSV record at row {row}"))?;

        let text = record.get(text_idx).unwrap_or_default().to_string();
        let raw_label = record.get(label_idx).unwrap_or_default();
        let toxic = parse_label(raw_label)
            .with_context(|| format!("Invalid label {raw_label:?} at row {row}"))?;

        examples.push(TrainingExample { text, toxic });
    }

    Ok(examples)
}

/// Accepts 0/1 (also as floats like "1.0") and true/false.
fn parse_label(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        "" => anyhow::bail!("label is empty"),
        other => anyhow::bail!("expected 0/1 or true/false, got {other:?}"),
    }
}
