// Colored terminal output for training results and one-off scores.
//
// main.rs delegates all user-facing formatting here.

use colored::Colorize;

use crate::scoring::Prediction;
use crate::training::TrainingOutcome;

/// Display the result of a training run: split sizes, convergence and the
/// held-out evaluation report.
pub fn display_training_summary(outcome: &TrainingOutcome) {
    let fit = outcome.fit();

    println!("\n{}", "=== Training Summary ===".bold());
    println!("  Train examples: {}", outcome.train_size);
    println!("  Test examples:  {}", outcome.test_size);
    println!(
        "  Vocabulary:     {} tokens",
        outcome.pipeline.vectorizer().dimension()
    );

    let status = if fit.converged {
        format!("converged after {} iterations", fit.iterations).green()
    } else {
        format!("stopped at the {}-iteration cap without converging", fit.iterations).yellow()
    };
    println!("  Optimizer:      {status}");
    println!("  Final loss:     {:.4}", fit.final_loss);

    match &outcome.report {
        Some(report) => {
            println!("\n{}", "Model Evaluation:".bold());
            println!("{report}");
        }
        None => println!("\n{}", "No held-out data; evaluation skipped.".dimmed()),
    }
}

/// Display a single scored text.
pub fn display_prediction(text: &str, prediction: &Prediction, threshold: f64) {
    let verdict = if prediction.is_toxic {
        "TOXIC".red().bold()
    } else {
        "ok".green().bold()
    };
    println!("  \"{}\"", super::truncate_chars(text, 80).dimmed());
    println!(
        "  Verdict: {}  (confidence {:.3}, threshold {})",
        verdict, prediction.confidence, threshold
    );
}
