use axum::{extract::State, Json};

use crate::errors::{AppError, JsonBody};
use crate::recommendation::gateway::{RecommendRequest, RecommendResponse};
use crate::recommendation::vector_index::IndexStats;
use crate::state::AppState;

/// POST /api/v1/careers/recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let response = state.recommender.recommend(&request).await?;
    Ok(Json(response))
}

/// GET /api/v1/careers/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<IndexStats>, AppError> {
    Ok(Json(state.recommender.stats().await?))
}
