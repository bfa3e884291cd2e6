// Model status display: shows artifact size, vocabulary and training facts.

use std::path::Path;

use anyhow::Result;

use crate::model::pipeline::Pipeline;

/// Display model status to the terminal.
pub fn show(model_path: &Path) -> Result<()> {
    if !model_path.exists() {
        println!("Model: not trained");
        println!("\nRun `toxiscan train` to build it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(model_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Model: {} ({})", model_path.display(), file_size);

    let pipeline = Pipeline::load(model_path)?;
    let meta = pipeline.metadata();
    let vectorizer = pipeline.vectorizer().config();

    println!(
        "Vocabulary: {} tokens (max {}, stop words: {:?})",
        pipeline.vectorizer().dimension(),
        vectorizer.max_features,
        vectorizer.stop_words
    );
    println!(
        "Trained: {} on {} examples",
        meta.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
        meta.train_samples
    );
    println!(
        "Classifier: C={} max_iter={} tol={}",
        meta.classifier.c, meta.classifier.max_iter, meta.classifier.tolerance
    );
    if meta.fit.converged {
        println!("Optimizer: converged in {} iterations", meta.fit.iterations);
    } else {
        println!(
            "Optimizer: did NOT converge ({} iterations); consider raising --max-iter",
            meta.fit.iterations
        );
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
