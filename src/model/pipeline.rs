// Trained pipeline: vectorizer + classifier, persisted as one JSON artifact.
//
// The artifact carries everything inference needs (vocabulary, idf weights,
// model parameters, feature-extraction settings) plus training metadata.
// It is written once by `train` and loaded once by `serve`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::logistic::{ClassifierConfig, FitReport, LogisticRegression, ModelParameters};
use crate::toxicity::traits::ToxicityScorer;
use crate::text::vectorizer::{TfIdfVectorizer, VectorizerConfig};

/// Bumped whenever the artifact layout changes incompatibly.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Facts about how the pipeline was trained. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub train_samples: usize,
    pub classifier: ClassifierConfig,
    pub fit: FitReport,
}

/// On-disk layout of a trained pipeline.
#[derive(Serialize, Deserialize)]
struct Artifact {
    format_version: u32,
    vectorizer: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    parameters: ModelParameters,
    metadata: TrainingMetadata,
}

/// A ready-to-use text → probability pipeline. Immutable; share it by `Arc`.
#[derive(Debug, Clone)]
pub struct Pipeline {
    vectorizer: TfIdfVectorizer,
    classifier: LogisticRegression,
    metadata: TrainingMetadata,
}

impl Pipeline {
    /// Fit the vectorizer on `texts`, then the classifier on the resulting
    /// features.
    pub fn fit<S: AsRef<str>>(
        vectorizer_config: VectorizerConfig,
        classifier_config: ClassifierConfig,
        texts: &[S],
        labels: &[bool],
    ) -> Result<Self> {
        if texts.len() != labels.len() {
            anyhow::bail!("Got {} texts but {} labels", texts.len(), labels.len());
        }

        let vectorizer = TfIdfVectorizer::fit(vectorizer_config, texts)?;
        let features = vectorizer.transform_batch(texts);
        let (classifier, fit) =
            LogisticRegression::fit(&classifier_config, &features, labels, vectorizer.dimension())?;

        Ok(Self {
            vectorizer,
            classifier,
            metadata: TrainingMetadata {
                trained_at: Utc::now(),
                train_samples: texts.len(),
                classifier: classifier_config,
                fit,
            },
        })
    }

    /// Probability that `text` is toxic.
    pub fn predict_probability(&self, text: &str) -> f64 {
        self.classifier
            .predict_probability(&self.vectorizer.transform(text))
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    /// Write the artifact to `path`, replacing whatever is there.
    ///
    /// The JSON goes to a sibling temp file first and is renamed into place,
    /// so a reader never sees a half-written artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let artifact = Artifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            vectorizer: self.vectorizer.config().clone(),
            vocabulary: self.vectorizer.vocabulary().clone(),
            idf: self.vectorizer.idf().to_vec(),
            parameters: self.classifier.parameters().clone(),
            metadata: self.metadata.clone(),
        };
        let json = serde_json::to_vec(&artifact).context("Failed to serialize model artifact")?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);
        std::fs::write(tmp_path, &json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        if let Err(e) = std::fs::rename(tmp_path, path) {
            let _ = std::fs::remove_file(tmp_path);
            return Err(e).with_context(|| {
                format!("Failed to move model artifact into {}", path.display())
            });
        }

        info!(
            path = %path.display(),
            bytes = json.len(),
            vocabulary = self.vectorizer.dimension(),
            "Saved model artifact"
        );
        Ok(())
    }

    /// Load an artifact written by [`Pipeline::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let artifact: Artifact = serde_json::from_slice(&bytes)
            .with_context(|| format!("Model artifact {} is corrupt", path.display()))?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            anyhow::bail!(
                "Model artifact {} has format version {}, expected {}. Retrain with `toxiscan train`.",
                path.display(),
                artifact.format_version,
                ARTIFACT_FORMAT_VERSION
            );
        }

        let vectorizer =
            TfIdfVectorizer::from_parts(artifact.vectorizer, artifact.vocabulary, artifact.idf)
                .with_context(|| format!("Model artifact {} is incompatible", path.display()))?;

        if artifact.parameters.weights.len() != vectorizer.dimension() {
            anyhow::bail!(
                "Model artifact {} is incompatible: {} weights for a {}-token vocabulary",
                path.display(),
                artifact.parameters.weights.len(),
                vectorizer.dimension()
            );
        }

        debug!(
            path = %path.display(),
            vocabulary = vectorizer.dimension(),
            "Loaded model artifact"
        );

        Ok(Self {
            vectorizer,
            classifier: LogisticRegression::from_parameters(artifact.parameters),
            metadata: artifact.metadata,
        })
    }
}

impl ToxicityScorer for Pipeline {
    fn probability(&self, text: &str) -> f64 {
        self.predict_probability(text)
    }
}
