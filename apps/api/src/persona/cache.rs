use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::persona::models::Persona;

/// Best-effort persona cache. Failures are logged and treated as a miss.
#[async_trait]
pub trait PersonaCache: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<Persona>;

    async fn put(&self, persona: &Persona, ttl: Duration);
}

pub struct RedisPersonaCache {
    client: redis::Client,
}

impl RedisPersonaCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn cache_key(user_id: &str) -> String {
    format!("persona:{user_id}")
}

#[async_trait]
impl PersonaCache for RedisPersonaCache {
    async fn get(&self, user_id: &str) -> Option<Persona> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Persona cache unavailable: {e}");
                return None;
            }
        };
        let raw: Option<String> = match conn.get(cache_key(user_id)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Persona cache read failed for {user_id}: {e}");
                return None;
            }
        };
        let persona = raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(persona) => Some(persona),
            Err(e) => {
                warn!("Discarding unreadable cached persona for {user_id}: {e}");
                None
            }
        });
        if persona.is_some() {
            debug!("Persona cache hit for {user_id}");
        }
        persona
    }

    async fn put(&self, persona: &Persona, ttl: Duration) {
        let json = match serde_json::to_string(persona) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialise persona for cache: {e}");
                return;
            }
        };
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Persona cache unavailable: {e}");
                return;
            }
        };
        let result: redis::RedisResult<()> = conn
            .set_ex(cache_key(&persona.user_id), json, ttl.as_secs().max(1))
            .await;
        if let Err(e) = result {
            warn!("Persona cache write failed for {}: {e}", persona.user_id);
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryPersonaCache {
        entries: Mutex<HashMap<String, Persona>>,
    }

    impl InMemoryPersonaCache {
        pub fn contains(&self, user_id: &str) -> bool {
            self.entries.lock().unwrap().contains_key(user_id)
        }
    }

    #[async_trait]
    impl PersonaCache for InMemoryPersonaCache {
        async fn get(&self, user_id: &str) -> Option<Persona> {
            self.entries.lock().unwrap().get(user_id).cloned()
        }

        async fn put(&self, persona: &Persona, _ttl: Duration) {
            self.entries
                .lock()
                .unwrap()
                .insert(persona.user_id.clone(), persona.clone());
        }
    }
}
