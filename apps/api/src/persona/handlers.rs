use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::persona::aggregator::load_persona;
use crate::persona::models::{Persona, PersonaQuery};
use crate::state::AppState;

/// GET /api/v1/persona/:user_id?force_refresh=true
pub async fn handle_get_persona(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PersonaQuery>,
) -> Result<Json<Persona>, AppError> {
    let persona = load_persona(
        state.store.as_ref(),
        state.persona_cache.as_deref(),
        state.persona_cache_ttl,
        &user_id,
        query.force_refresh,
    )
    .await?;
    Ok(Json(persona))
}
