use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable identifier of a catalog movie (the TMDB movie id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(alias = "movie_id")]
    pub id: MovieId,
    pub title: String,
    /// Free text summarizing plot, genres, cast and crew
    pub tags: String,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id: MovieId(id),
            title: title.into(),
            tags: tags.into(),
        }
    }
}

/// Rating as shown to the user: a score, or a label such as "N/A"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Label(String),
}

impl Rating {
    pub fn not_available() -> Self {
        Rating::Label("N/A".to_string())
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{}", score),
            Rating::Label(label) => write!(f, "{}", label),
        }
    }
}

/// Display metadata fetched from the details service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub poster: String,
    pub rating: Rating,
    /// Four digit release year, or empty when unknown
    pub year: String,
    /// Comma separated genre names
    pub genres: String,
    pub overview: String,
}

/// A single recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub poster: String,
    pub rating: Rating,
    pub year: String,
    pub genres: String,
    pub overview: String,
}

impl Recommendation {
    pub fn from_details(title: impl Into<String>, details: MovieDetails) -> Self {
        Self {
            title: title.into(),
            poster: details.poster,
            rating: details.rating,
            year: details.year,
            genres: details.genres,
            overview: details.overview,
        }
    }
}
