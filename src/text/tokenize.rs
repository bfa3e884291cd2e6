// Tokenizer for comment text.
//
// Tokens are runs of two or more word characters (`\b\w\w+\b`), optionally
// lowercased first, with stop words dropped. Single characters never become
// tokens, so "a" or "I" are ignored even without a stop-word list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Which stop-word list the tokenizer filters against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWords {
    /// The English list shipped with the `stop-words` crate
    English,
    /// Keep every token
    None,
}

/// Splits text into vocabulary tokens.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
    lowercase: bool,
}

impl Tokenizer {
    pub fn new(stop_words: StopWords, lowercase: bool) -> Self {
        let stop_words = match stop_words {
            StopWords::English => get(LANGUAGE::English)
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            StopWords::None => HashSet::new(),
        };
        Self {
            stop_words,
            lowercase,
        }
    }

    /// Tokenize a single document, preserving order and duplicates.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_characters_are_skipped() {
        let tokenizer = Tokenizer::new(StopWords::None, true);
        assert_eq!(tokenizer.tokenize("a b cd e"), vec!["cd"]);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        let tokenizer = Tokenizer::new(StopWords::None, true);
        assert_eq!(
            tokenizer.tokenize("Free-money!!! NOW, please."),
            vec!["free", "money", "now", "please"]
        );
    }

    #[test]
    fn test_lowercase_disabled_keeps_case() {
        let tokenizer = Tokenizer::new(StopWords::None, false);
        assert_eq!(tokenizer.tokenize("Hello World"), vec!["Hello", "World"]);
    }

    #[test]
    fn test_english_stop_words_removed() {
        let tokenizer = Tokenizer::new(StopWords::English, true);
        let tokens = tokenizer.tokenize("the and of");
        assert!(tokens.is_empty(), "Common stop words survived: {tokens:?}");
    }

    #[test]
    fn test_english_list_is_broad() {
        // The stopwords-iso list also drops words like "free", "now" and "great"
        let tokenizer = Tokenizer::new(StopWords::English, true);
        assert_eq!(tokenizer.tokenize("free money now"), vec!["money"]);
        assert!(tokenizer.tokenize("this is great").is_empty());
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        let tokenizer = Tokenizer::new(StopWords::English, true);
        assert!(tokenizer.tokenize("").is_empty());
    }
}
