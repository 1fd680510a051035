//! Client seam for the external nearest-neighbour index holding career vectors.
//!
//! The index owns all retrieval logic. This crate only sends a query vector
//! and reads back ids, similarity scores and stored metadata.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const API_VERSION: &str = "2024-07";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    /// Raw cosine similarity in [-1, 1].
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub dimension: usize,
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub index_fullness: f64,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, vector: &[f32], top_k: u32) -> Result<Vec<IndexMatch>, IndexError>;

    async fn stats(&self) -> Result<IndexStats, IndexError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u32,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// Pinecone data-plane client for one index host.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PineconeIndex {
    pub fn new(host: &str, api_key: String) -> Result<Self, IndexError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url: base_url(host),
            api_key,
        })
    }

    async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IndexError> {
        let response = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: u32) -> Result<Vec<IndexMatch>, IndexError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };
        let response: QueryResponse = self.post("query", &request).await?;
        debug!("Vector index returned {} matches", response.matches.len());
        Ok(response.matches)
    }

    async fn stats(&self) -> Result<IndexStats, IndexError> {
        self.post("describe_index_stats", &serde_json::json!({}))
            .await
    }
}

/// Accepts a bare index host or a full URL.
fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
