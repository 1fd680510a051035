use std::sync::Arc;
use std::time::Duration;

use crate::assessment::classifier::NarrativeProvider;
use crate::assessment::store::ResultStore;
use crate::persona::cache::PersonaCache;
use crate::recommendation::gateway::RecommendationGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    /// LLM narrator when an API key is configured, otherwise always falls back
    /// to the threshold table.
    pub narrator: Arc<dyn NarrativeProvider>,
    pub recommender: Arc<RecommendationGateway>,
    pub persona_cache: Option<Arc<dyn PersonaCache>>,
    pub narrative_timeout: Duration,
    pub persona_cache_ttl: Duration,
}
