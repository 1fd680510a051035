use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Persona cache is disabled when unset.
    pub redis_url: Option<String>,
    /// Narrative classification is disabled (rule-based only) when unset.
    pub anthropic_api_key: Option<String>,
    pub pinecone_api_key: String,
    pub pinecone_index_host: String,
    pub embedding_dimension: usize,
    pub narrative_timeout: Duration,
    pub persona_cache_ttl: Duration,
    pub circuit_breaker_threshold: u32,
    pub circuit_breaker_reset: Duration,
    pub recommend_max_top_k: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            pinecone_api_key: require_env("PINECONE_API_KEY")?,
            pinecone_index_host: require_env("PINECONE_INDEX_HOST")?,
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", 768)?,
            narrative_timeout: Duration::from_secs(parse_env("NARRATIVE_TIMEOUT_SECS", 10)?),
            persona_cache_ttl: Duration::from_secs(parse_env("PERSONA_CACHE_TTL_SECS", 900)?),
            circuit_breaker_threshold: parse_env("CIRCUIT_BREAKER_THRESHOLD", 5)?,
            circuit_breaker_reset: Duration::from_secs(parse_env(
                "CIRCUIT_BREAKER_RESET_SECS",
                60,
            )?),
            recommend_max_top_k: parse_env("RECOMMEND_MAX_TOP_K", 50)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'"))
}
