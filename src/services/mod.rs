pub mod mood;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

pub use mood::MoodPolicy;
pub use providers::{DetailEnricher, TmdbEnricher};
pub use recommendations::RecommendationEngine;
pub use similarity::SimilarityMatrix;
pub use vectorizer::{FeatureVectors, Vectorizer};
