use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::Recommendation,
    services::recommendations::DEFAULT_LIMIT,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    pub mood: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub mood: String,
    pub recommendations: Vec<Recommendation>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// List every catalog title in corpus order
pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.list_titles())
}

/// List mood labels in policy order
pub async fn list_moods(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.list_moods())
}

/// Recommend movies similar to a title that fit a mood
///
/// An unknown title gives an empty list. The limit is capped at the engine's
/// candidate pool since no more results could be found anyway.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = request.limit.min(state.engine.candidate_pool());

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        mood = %request.mood,
        limit = limit,
        "Processing recommendation request"
    );

    let recommendations = state
        .engine
        .recommend(state.enricher.as_ref(), &request.title, &request.mood, limit)
        .await?;

    if recommendations.is_empty() {
        tracing::info!(request_id = %request_id, "No recommendations found for this mood");
    }

    Ok(Json(RecommendationResponse {
        title: request.title,
        mood: request.mood,
        recommendations,
    }))
}
