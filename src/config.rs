use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::scoring::DEFAULT_THRESHOLD;

/// Where and how the scoring service listens.
///
/// One service covers both the public deployment (`HOST=0.0.0.0`,
/// `PORT` from the platform) and the local sidecar (`127.0.0.1:5002`, debug).
#[derive(Debug, Clone, PartialEq)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    /// Verbose logging plus per-request HTTP tracing
    pub debug: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5002,
            debug: false,
        }
    }
}

impl ServeConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override individual values after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact written by `train` and read by `serve` / `score`
    pub model_path: PathBuf,
    /// Default training CSV
    pub data_path: PathBuf,
    pub serve: ServeConfig,
    /// Probability above which text is flagged toxic
    pub threshold: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let defaults = ServeConfig::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            Err(_) => defaults.port,
        };

        let debug = env::var("TOXISCAN_DEBUG")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.debug);

        let threshold = match env::var("TOXISCAN_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("TOXISCAN_THRESHOLD must be a number, got {raw:?}"))?,
            Err(_) => DEFAULT_THRESHOLD,
        };
        validate_threshold(threshold)?;

        Ok(Self {
            model_path: env::var("TOXISCAN_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("toxic_model.json")),
            data_path: env::var("TOXISCAN_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("train.csv")),
            serve: ServeConfig {
                host: env::var("HOST").unwrap_or(defaults.host),
                port,
                debug,
            },
            threshold,
        })
    }

    /// Check that a trained model exists before anything tries to load it.
    pub fn require_model(&self) -> Result<()> {
        if !self.model_path.exists() {
            anyhow::bail!(
                "Model artifact not found at {}\n\
                 Run `toxiscan train` to create it, or set TOXISCAN_MODEL_PATH.",
                self.model_path.display()
            );
        }
        Ok(())
    }
}

/// Thresholds are probabilities, so they must lie in [0, 1].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("Threshold must be between 0 and 1, got {threshold}");
    }
    Ok(())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_threshold_bounds() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(0.3).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_bind_addr() {
        let serve = ServeConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        };
        assert_eq!(serve.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_require_model_missing() {
        let config = Config {
            model_path: std::env::temp_dir().join("toxiscan-no-such-model.json"),
            data_path: PathBuf::from("train.csv"),
            serve: ServeConfig::default(),
            threshold: DEFAULT_THRESHOLD,
        };
        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("toxiscan train"));
    }
}
