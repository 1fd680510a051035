//! Recommendation Gateway: persona embedding in, career fit scores out.
//!
//! Validates the query vector, forwards it to the vector index through a
//! circuit breaker, and republishes each match's raw cosine similarity as a
//! 0–100 fit score. Ranking, filtering and deduplication are left to the index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::circuit_breaker::{BreakerError, CircuitBreaker};
use crate::errors::AppError;
use crate::recommendation::vector_index::{IndexError, IndexMatch, IndexStats, VectorIndex};

pub const DEFAULT_TOP_K: u32 = 5;
const SERVICE: &str = "vector-index";

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub persona_embedding: Vec<f32>,
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerMatch {
    pub career_id: String,
    pub title: Option<String>,
    /// 0–100.
    pub fit_score: f64,
    pub raw_similarity: f32,
    pub skills: Vec<String>,
    pub salary_range: Option<SalaryRange>,
    pub demand_score: Option<f64>,
    pub growth_rate: Option<f64>,
    /// Everything the index stored alongside the vector.
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub matches: Vec<CareerMatch>,
    pub recommendation_confidence: Confidence,
}

/// Maps a cosine similarity in [-1, 1] onto a 0–100 percentage, two decimals.
///
/// Always applied: the index is queried for raw cosine similarity, so the
/// score is never interpreted as an existing percentage.
pub fn fit_score(similarity: f32) -> f64 {
    let pct = ((f64::from(similarity) + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0);
    (pct * 100.0).round() / 100.0
}

pub fn confidence(matches: &[CareerMatch]) -> Confidence {
    match matches.first().map(|m| m.fit_score) {
        None => Confidence::None,
        Some(top) if top >= 85.0 => Confidence::High,
        Some(top) if top >= 70.0 => Confidence::Medium,
        Some(_) => Confidence::Low,
    }
}

pub struct RecommendationGateway {
    index: Arc<dyn VectorIndex>,
    breaker: CircuitBreaker,
    dimension: usize,
    max_top_k: u32,
}

impl RecommendationGateway {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        breaker: CircuitBreaker,
        dimension: usize,
        max_top_k: u32,
    ) -> Self {
        Self {
            index,
            breaker,
            dimension,
            max_top_k,
        }
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, AppError> {
        let top_k = self.validate(request)?;

        let raw = self
            .breaker
            .call(|| self.index.query(&request.persona_embedding, top_k))
            .await
            .map_err(dependency_error)?;

        let matches: Vec<CareerMatch> = raw.into_iter().map(to_career_match).collect();
        let recommendation_confidence = confidence(&matches);

        info!(
            "Recommended {} careers (top_k={top_k}, confidence={recommendation_confidence:?})",
            matches.len()
        );

        Ok(RecommendResponse {
            matches,
            recommendation_confidence,
        })
    }

    pub async fn stats(&self) -> Result<IndexStats, AppError> {
        self.breaker
            .call(|| self.index.stats())
            .await
            .map_err(dependency_error)
    }

    fn validate(&self, request: &RecommendRequest) -> Result<u32, AppError> {
        let embedding = &request.persona_embedding;
        if embedding.is_empty() {
            return Err(AppError::Validation(
                "persona_embedding cannot be empty".to_string(),
            ));
        }
        if embedding.len() != self.dimension {
            return Err(AppError::Validation(format!(
                "persona_embedding must have {} dimensions (got {})",
                self.dimension,
                embedding.len()
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Validation(
                "persona_embedding must contain only finite numbers".to_string(),
            ));
        }

        let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 || top_k > self.max_top_k {
            return Err(AppError::Validation(format!(
                "top_k must be between 1 and {}",
                self.max_top_k
            )));
        }
        Ok(top_k)
    }
}

fn dependency_error(err: BreakerError<IndexError>) -> AppError {
    AppError::dependency(SERVICE, err.to_string())
}

fn to_career_match(m: IndexMatch) -> CareerMatch {
    let metadata = m.metadata;
    CareerMatch {
        career_id: m.id,
        title: metadata
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string),
        fit_score: fit_score(m.score),
        raw_similarity: m.score,
        skills: metadata
            .get("skills")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        salary_range: salary_range(&metadata),
        demand_score: metadata.get("demand_score").and_then(Value::as_f64),
        growth_rate: metadata.get("growth_rate").and_then(Value::as_f64),
        metadata,
    }
}

/// Reads either a nested `salary_range {min, max}` object or flat
/// `salary_min` / `salary_max` fields.
fn salary_range(metadata: &Map<String, Value>) -> Option<SalaryRange> {
    if let Some(range) = metadata.get("salary_range") {
        if let Ok(parsed) = serde_json::from_value::<SalaryRange>(range.clone()) {
            return Some(parsed);
        }
    }
    let min = metadata.get("salary_min").and_then(Value::as_f64)?;
    let max = metadata.get("salary_max").and_then(Value::as_f64)?;
    Some(SalaryRange { min, max })
}
