// TF-IDF vectorizer with a bounded vocabulary.
//
// Each training comment is one document. The vocabulary keeps the
// `max_features` tokens that occur in the most documents, and every
// vocabulary token gets a smoothed inverse document frequency:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// A transformed document is raw term count × idf, L2-normalized. Tokens the
// vocabulary doesn't know contribute nothing, so unseen text always lands in
// the same coordinate space the classifier was trained on.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::tokenize::{StopWords, Tokenizer};

/// Feature-extraction settings. Persisted with the model so inference
/// tokenizes exactly the way training did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Upper bound on vocabulary size
    pub max_features: usize,
    pub stop_words: StopWords,
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 50_000,
            stop_words: StopWords::English,
            lowercase: true,
        }
    }
}

/// Sparse feature vector: (feature index, weight) pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product against a dense weight vector.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| v * dense[i]).sum()
    }

    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }
}

/// A fitted TF-IDF vectorizer. Immutable once built.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    tokenizer: Tokenizer,
    /// token -> feature index; indices follow lexicographic token order
    vocabulary: BTreeMap<String, usize>,
    /// idf weight per feature index
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learn the vocabulary and idf weights from a training corpus.
    pub fn fit<S: AsRef<str>>(config: VectorizerConfig, corpus: &[S]) -> Result<Self> {
        if corpus.is_empty() {
            anyhow::bail!("Cannot fit a vectorizer on an empty corpus");
        }
        if config.max_features == 0 {
            anyhow::bail!("max_features must be at least 1");
        }

        let tokenizer = Tokenizer::new(config.stop_words, config.lowercase);

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let tokens = tokenizer.tokenize(doc.as_ref());
            let mut seen = HashSet::new();
            for token in tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token).or_insert(0) += 1;
                }
            }
        }

        if doc_freq.is_empty() {
            anyhow::bail!(
                "Corpus of {} documents produced no tokens; every document is empty or stop words",
                corpus.len()
            );
        }

        // Rank by document frequency, then total count, then the token itself
        // so the selection is deterministic.
        let mut ranked: Vec<(String, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|(a, df_a), (b, df_b)| {
            df_b.cmp(df_a)
                .then_with(|| term_freq[b].cmp(&term_freq[a]))
                .then_with(|| a.cmp(b))
        });
        let dropped = ranked.len().saturating_sub(config.max_features);
        ranked.truncate(config.max_features);
        ranked.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(ranked.len());
        for (index, (token, df)) in ranked.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(token, index);
        }

        info!(
            documents = corpus.len(),
            vocabulary = vocabulary.len(),
            dropped,
            "Fitted TF-IDF vocabulary"
        );

        Ok(Self {
            config,
            tokenizer,
            vocabulary,
            idf,
        })
    }

    /// Rebuild a fitted vectorizer from persisted parts.
    ///
    /// Fails if the vocabulary and idf table disagree, which means the
    /// artifact was truncated or edited by hand.
    pub fn from_parts(
        config: VectorizerConfig,
        vocabulary: BTreeMap<String, usize>,
        idf: Vec<f64>,
    ) -> Result<Self> {
        if vocabulary.len() != idf.len() {
            anyhow::bail!(
                "Vocabulary has {} tokens but idf table has {} entries",
                vocabulary.len(),
                idf.len()
            );
        }
        let mut used = vec![false; idf.len()];
        for (token, &index) in &vocabulary {
            match used.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => anyhow::bail!("Feature index {index} assigned twice (token {token:?})"),
                None => anyhow::bail!("Token {token:?} has out-of-range feature index {index}"),
            }
        }

        let tokenizer = Tokenizer::new(config.stop_words, config.lowercase);
        Ok(Self {
            config,
            tokenizer,
            vocabulary,
            idf,
        })
    }

    /// Map text into the fitted feature space.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut entries {
                *v /= norm;
            }
        }

        SparseVector { entries }
    }

    pub fn transform_batch<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<SparseVector> {
        corpus.iter().map(|doc| self.transform(doc.as_ref())).collect()
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of feature dimensions.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }
}
