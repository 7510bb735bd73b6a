use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("Failed to load corpus: {0}")]
    CorpusLoad(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnknownMood(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::EmptyCorpus
            | AppError::CorpusLoad(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Reasons a movie detail lookup can fail
///
/// The recommendation engine treats every variant the same way (the candidate
/// is skipped), but the tag is kept for logging.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("request timed out")]
    Timeout,

    #[error("movie not found")]
    NotFound,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("upstream returned status {0}")]
    Upstream(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnrichmentError::Timeout
        } else if err.is_decode() {
            EnrichmentError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            EnrichmentError::Upstream(status.as_u16())
        } else {
            EnrichmentError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EnrichmentError {
    fn from(err: serde_json::Error) -> Self {
        EnrichmentError::MalformedResponse(err.to_string())
    }
}
