//! TMDB movie details provider
//!
//! API Flow:
//! 1. Details: /3/movie/{id}?api_key=...&language=en-US → poster path, rating,
//!    release date, genres and overview
//!
//! Successful lookups are cached by movie id for the process lifetime.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::EnrichmentError,
    models::{MovieDetails, MovieId, TmdbMovie},
    services::providers::DetailEnricher,
};
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbEnricher {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    poster_base_url: String,
    cache: Cache,
    timeout: Duration,
}

impl TmdbEnricher {
    /// Creates a provider whose every lookup, cache read included, is bounded
    /// by `timeout`
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        poster_base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            poster_base_url,
            cache,
            timeout,
        })
    }

    fn details_url(&self, movie_id: MovieId) -> String {
        format!("{}/3/movie/{}", self.api_url, movie_id)
    }

    /// Calls TMDB without consulting the cache
    async fn fetch_remote(&self, movie_id: MovieId) -> Result<MovieDetails, EnrichmentError> {
        let response = self
            .http_client
            .get(self.details_url(movie_id))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let body = response.text().await?;
        let movie: TmdbMovie = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, movie_id = %movie_id, "Failed to deserialize TMDB response");
            EnrichmentError::from(e)
        })?;

        let details = movie.into_details(&self.poster_base_url);

        tracing::info!(
            movie_id = %movie_id,
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }
}

/// Maps a non-success HTTP status to a failure reason
fn classify_status(status: StatusCode) -> EnrichmentError {
    match status {
        StatusCode::NOT_FOUND => EnrichmentError::NotFound,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => EnrichmentError::Timeout,
        other => EnrichmentError::Upstream(other.as_u16()),
    }
}

#[async_trait::async_trait]
impl DetailEnricher for TmdbEnricher {
    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, EnrichmentError> {
        let lookup = async {
            let details: Result<MovieDetails, EnrichmentError> = cached!(
                self.cache,
                CacheKey::MovieDetails(movie_id),
                self.fetch_remote(movie_id)
            );
            details
        };

        tokio::time::timeout(self.timeout, lookup)
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(
                    movie_id = %movie_id,
                    provider = "tmdb",
                    "Movie details lookup timed out"
                );
                Err(EnrichmentError::Timeout)
            })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
