pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessments;
use crate::middleware::sanitizer::sanitize_json_body;
use crate::persona::handlers as persona;
use crate::recommendation::handlers as careers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessments
        .route(
            "/api/v1/assessments/:kind/questions",
            get(assessments::handle_get_questions),
        )
        .route(
            "/api/v1/assessments/:kind/submit",
            post(assessments::handle_submit),
        )
        .route(
            "/api/v1/assessments/:kind/results/:user_id",
            get(assessments::handle_get_result),
        )
        // Careers
        .route("/api/v1/careers/recommend", post(careers::handle_recommend))
        .route("/api/v1/careers/stats", get(careers::handle_stats))
        // Persona
        .route("/api/v1/persona/:user_id", get(persona::handle_get_persona))
        .layer(middleware::from_fn(sanitize_json_body))
        .with_state(state)
}
