// Text feature extraction: tokenization and TF-IDF vectorization.

pub mod tokenize;
pub mod vectorizer;
