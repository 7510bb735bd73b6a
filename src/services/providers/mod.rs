//! Movie detail providers
//!
//! The recommendation engine only needs display metadata for the movies it
//! returns. Providers fetch that metadata from a remote service and report
//! failures as a tagged [`EnrichmentError`] so callers can log the cause.

use crate::{
    error::EnrichmentError,
    models::{MovieDetails, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbEnricher;

/// Trait for movie detail providers
///
/// Implementations must bound every remote call with a timeout and return
/// [`EnrichmentError::Timeout`] when it elapses. A missing poster is not a
/// failure; providers substitute a placeholder instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DetailEnricher: Send + Sync {
    /// Fetch display details for one catalog movie
    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, EnrichmentError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
