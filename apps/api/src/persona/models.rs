use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::scoring::ScoreVector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    pub work_style: bool,
    pub empathy: bool,
}

impl DataSources {
    pub fn available(&self) -> usize {
        usize::from(self.work_style) + usize::from(self.empathy)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Work-style trait scores, keyed by dimension.
    pub big_five: ScoreVector,
    pub work_style: Option<String>,
    pub empathy_score: Option<f64>,
    pub empathy_level: Option<String>,
    pub team_role: Option<String>,
}

/// Unified view of everything the assessments say about one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub user_id: String,
    pub data_sources: DataSources,
    pub personality: Personality,
    /// Fraction of assessment sources present, 0.0–1.0.
    pub completeness: f64,
    pub career_suggestions: Vec<String>,
    /// Set when a source is missing because its read failed, not because
    /// the assessment was never taken.
    #[serde(default)]
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonaQuery {
    #[serde(default)]
    pub force_refresh: bool,
}
