use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One row per user × assessment. Resubmission replaces the row wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentResultRow {
    pub user_id: String,
    pub assessment: String,
    pub label: String,
    pub classification_source: String,
    /// Full `AssessmentResult` as returned to the caller.
    pub result: Value,
    pub submitted_at: DateTime<Utc>,
}
