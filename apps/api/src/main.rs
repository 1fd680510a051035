mod assessment;
mod circuit_breaker;
mod config;
mod db;
mod errors;
mod llm_client;
mod middleware;
mod models;
mod persona;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::assessment::classifier::{DisabledNarrator, LlmNarrator, NarrativeProvider};
use crate::assessment::store::PgResultStore;
use crate::circuit_breaker::CircuitBreaker;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::persona::cache::{PersonaCache, RedisPersonaCache};
use crate::recommendation::gateway::RecommendationGateway;
use crate::recommendation::vector_index::PineconeIndex;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Guidora API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL result store (migrations applied on connect)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgResultStore::new(db));

    // Narrative provider: LLM when keyed, threshold table otherwise
    let narrator: Arc<dyn NarrativeProvider> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.narrative_timeout)?;
            info!("LLM narrator enabled (model: {})", llm_client::MODEL);
            Arc::new(LlmNarrator(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; classification is rule-based only");
            Arc::new(DisabledNarrator)
        }
    };

    // Vector index behind a circuit breaker
    let index = PineconeIndex::new(&config.pinecone_index_host, config.pinecone_api_key.clone())?;
    let recommender = RecommendationGateway::new(
        Arc::new(index),
        CircuitBreaker::new(
            "vector-index",
            config.circuit_breaker_threshold,
            config.circuit_breaker_reset,
        ),
        config.embedding_dimension,
        config.recommend_max_top_k,
    );
    info!(
        "Recommendation gateway ready (dimension {}, max top_k {})",
        config.embedding_dimension, config.recommend_max_top_k
    );

    // Optional Redis persona cache
    let persona_cache: Option<Arc<dyn PersonaCache>> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis persona cache enabled");
            Some(Arc::new(RedisPersonaCache::new(client)))
        }
        None => None,
    };

    // Build app state
    let state = AppState {
        store,
        narrator,
        recommender: Arc::new(recommender),
        persona_cache,
        narrative_timeout: config.narrative_timeout,
        persona_cache_ttl: config.persona_cache_ttl,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
