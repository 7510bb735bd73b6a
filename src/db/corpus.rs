use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// The fixed movie catalog
///
/// Positions are stable for the lifetime of the value: index `i` is the same
/// movie in the corpus, in the feature vectors and in the similarity matrix.
#[derive(Debug, Clone)]
pub struct Corpus {
    movies: Vec<Movie>,
}

impl Corpus {
    /// Wraps an already loaded list of movies
    pub fn new(movies: Vec<Movie>) -> AppResult<Self> {
        if movies.is_empty() {
            return Err(AppError::EmptyCorpus);
        }
        Ok(Self { movies })
    }

    /// Parses a JSON array of `{movie_id, title, tags}` records
    pub fn from_json(json: &str) -> AppResult<Self> {
        let movies: Vec<Movie> = serde_json::from_str(json)
            .map_err(|e| AppError::CorpusLoad(format!("Invalid corpus JSON: {}", e)))?;
        Self::new(movies)
    }

    /// Loads the catalog from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::CorpusLoad(format!("{}: {}", path.display(), e)))?;

        let corpus = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            movies = corpus.len(),
            "Corpus loaded"
        );

        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Finds the position of a movie by exact title
    ///
    /// Titles are not unique. The first match by position wins, so repeated
    /// lookups of a duplicated title always resolve to the same movie.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    /// All titles in catalog order
    pub fn titles(&self) -> Vec<String> {
        self.movies.iter().map(|m| m.title.clone()).collect()
    }
}
