//! Axum route handlers for the Assessment API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::assessment::definitions::{definition, AssessmentKind};
use crate::assessment::models::{AssessmentResult, QuestionSetResponse, SubmitRequest};
use crate::assessment::submit::process_submission;
use crate::errors::{AppError, JsonBody};
use crate::state::AppState;

fn parse_kind(raw: &str) -> Result<AssessmentKind, AppError> {
    AssessmentKind::parse(raw).ok_or_else(|| AppError::NotFound(format!("Unknown assessment '{raw}'")))
}

/// GET /api/v1/assessments/:kind/questions
///
/// Serves the static question table verbatim.
pub async fn handle_get_questions(
    Path(kind): Path<String>,
) -> Result<Json<QuestionSetResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(QuestionSetResponse::from(definition(kind))))
}

/// POST /api/v1/assessments/:kind/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    JsonBody(request): JsonBody<SubmitRequest>,
) -> Result<Json<AssessmentResult>, AppError> {
    let kind = parse_kind(&kind)?;
    let result = process_submission(
        kind,
        request,
        state.narrator.as_ref(),
        state.narrative_timeout,
        state.store.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/v1/assessments/:kind/results/:user_id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path((kind, user_id)): Path<(String, String)>,
) -> Result<Json<AssessmentResult>, AppError> {
    let kind = parse_kind(&kind)?;
    let user_id = user_id.trim();
    let result = state.store.fetch(user_id, kind).await?.ok_or_else(|| {
        AppError::NotFound(format!("No {kind} assessment found for user {user_id}"))
    })?;
    Ok(Json(result))
}
