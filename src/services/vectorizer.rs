use std::collections::HashMap;

use crate::{
    db::Corpus,
    error::{AppError, AppResult},
    services::stop_words,
};

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Term-count vectors for every movie in a corpus, plus the shared vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVectors {
    /// Vocabulary terms in alphabetical order; position = vector column
    pub vocabulary: Vec<String>,
    /// One row per corpus position: `(column, count)` pairs for the non-zero
    /// counts, sorted by column
    pub vectors: Vec<Vec<(usize, u32)>>,
}

impl FeatureVectors {
    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    /// Count of vocabulary `column` in row `row`, zero when absent
    pub fn count(&self, row: usize, column: usize) -> u32 {
        self.vectors
            .get(row)
            .and_then(|r| {
                r.binary_search_by_key(&column, |&(col, _)| col)
                    .ok()
                    .map(|idx| r[idx].1)
            })
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Bag-of-words count vectorizer
///
/// The vocabulary is learned from the corpus alone: the `max_features` most
/// frequent non stop-word terms, ties broken alphabetically. Counts are raw,
/// with no inverse document frequency weighting.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    max_features: usize,
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl Vectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Vectorizes the tags of every movie in corpus order
    pub fn vectorize(&self, corpus: &Corpus) -> AppResult<FeatureVectors> {
        let documents: Vec<&str> = corpus.movies().iter().map(|m| m.tags.as_str()).collect();
        self.vectorize_documents(&documents)
    }

    /// Vectorizes raw documents; fails on an empty input
    pub fn vectorize_documents<S: AsRef<str>>(&self, documents: &[S]) -> AppResult<FeatureVectors> {
        if documents.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *term_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_str(), idx))
            .collect();

        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for token in tokens {
                    if let Some(&col) = columns.get(token.as_str()) {
                        *counts.entry(col).or_insert(0) += 1;
                    }
                }
                let mut row: Vec<(usize, u32)> = counts.into_iter().collect();
                row.sort_unstable();
                row
            })
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            max_features = self.max_features,
            "Corpus vectorized"
        );

        Ok(FeatureVectors {
            vocabulary,
            vectors,
        })
    }
}

/// Lowercases and splits on anything that is not a word character
///
/// Tokens shorter than two characters and stop words are dropped.
fn tokenize(text: &str) -> Vec<String> {
    let stop_words = stop_words::english();

    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stop_words.contains(*t))
        .map(str::to_string)
        .collect()
}
