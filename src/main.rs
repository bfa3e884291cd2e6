use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};

use toxiscan::config::{validate_threshold, Config};
use toxiscan::model::pipeline::Pipeline;
use toxiscan::text::tokenize::StopWords;
use toxiscan::training::dataset::Columns;
use toxiscan::training::TrainOptions;

/// Toxiscan: bag-of-words toxicity classifier.
///
/// Train a TF-IDF + logistic regression model on labeled comments, then
/// serve it over HTTP.
#[derive(Parser)]
#[command(name = "toxiscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a labeled CSV and save it
    Train {
        /// Training CSV (default: TOXISCAN_DATA_PATH or train.csv)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Where to write the model (default: TOXISCAN_MODEL_PATH or toxic_model.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum vocabulary size
        #[arg(long, default_value = "50000")]
        max_features: usize,

        /// Maximum optimizer iterations
        #[arg(long, default_value = "300")]
        max_iter: usize,

        /// Inverse regularization strength
        #[arg(long, default_value = "1.0")]
        c: f64,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Seed for the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Name of the text column
        #[arg(long, default_value = "comment_text")]
        text_column: String,

        /// Name of the 0/1 label column
        #[arg(long, default_value = "toxic")]
        label_column: String,

        /// Keep stop words in the vocabulary
        #[arg(long)]
        keep_stop_words: bool,
    },

    /// Serve the model over HTTP (POST /predict)
    Serve {
        /// Bind address (default: HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port (default: PORT or 5002)
        #[arg(long)]
        port: Option<u16>,

        /// Verbose logging and per-request tracing
        #[arg(long)]
        debug: bool,

        /// Toxicity threshold (default: TOXISCAN_THRESHOLD or 0.3)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Score a single piece of text
    Score {
        /// The text to score
        text: String,

        /// Toxicity threshold (default: TOXISCAN_THRESHOLD or 0.3)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show model status (size, vocabulary, training facts)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    if let Commands::Serve { debug: true, .. } = cli.command {
        config.serve.debug = true;
    }

    // Set up structured logging
    let default_filter = if config.serve.debug {
        "toxiscan=debug,tower_http=debug"
    } else {
        "toxiscan=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Train {
            data,
            output,
            max_features,
            max_iter,
            c,
            test_size,
            seed,
            text_column,
            label_column,
            keep_stop_words,
        } => {
            let mut options = TrainOptions {
                data_path: data.unwrap_or(config.data_path),
                output_path: output.unwrap_or(config.model_path),
                columns: Columns {
                    text: text_column,
                    label: label_column,
                },
                test_fraction: test_size,
                seed,
                threshold: config.threshold,
                show_progress: true,
                ..TrainOptions::default()
            };
            options.vectorizer.max_features = max_features;
            if keep_stop_words {
                options.vectorizer.stop_words = StopWords::None;
            }
            options.classifier.max_iter = max_iter;
            options.classifier.c = c;

            println!("Loading training data from {}...", options.data_path.display());
            let outcome = toxiscan::training::run(&options)?;

            toxiscan::output::terminal::display_training_summary(&outcome);
            println!(
                "\n{}",
                format!("Model saved as {}", options.output_path.display()).bold()
            );
        }

        Commands::Serve {
            host,
            port,
            debug: _,
            threshold,
        } => {
            if let Some(host) = host {
                config.serve.host = host;
            }
            if let Some(port) = port {
                config.serve.port = port;
            }
            let threshold = threshold.unwrap_or(config.threshold);
            validate_threshold(threshold)?;

            // The service cannot run without a model, so any load failure is fatal.
            let pipeline = match load_pipeline(&config) {
                Ok(p) => p,
                Err(e) => {
                    error!(error = %e, "Failed to load model; refusing to start");
                    return Err(e);
                }
            };
            info!(
                vocabulary = pipeline.vectorizer().dimension(),
                threshold, "Model loaded"
            );

            let state = toxiscan::web::AppState::new(Arc::new(pipeline), threshold);
            toxiscan::web::run_server(&config.serve, state).await?;
        }

        Commands::Score { text, threshold } => {
            let threshold = threshold.unwrap_or(config.threshold);
            validate_threshold(threshold)?;
            let pipeline = load_pipeline(&config)?;

            let prediction = toxiscan::scoring::score(&pipeline, &text, threshold)?;
            toxiscan::output::terminal::display_prediction(&text, &prediction, threshold);
        }

        Commands::Status => {
            toxiscan::status::show(&config.model_path)?;
        }
    }

    Ok(())
}

fn load_pipeline(config: &Config) -> Result<Pipeline> {
    config.require_model()?;
    Pipeline::load(&config.model_path)
}
