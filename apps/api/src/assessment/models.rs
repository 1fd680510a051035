use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::classifier::Classification;
use crate::assessment::definitions::{AssessmentDefinition, AssessmentKind, Question};
use crate::assessment::profile::AssessmentDetails;
use crate::assessment::scoring::{ScoreVector, Submission};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    pub answers: Submission,
}

/// Scored, classified submission. Returned to the caller and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub user_id: String,
    pub assessment: AssessmentKind,
    pub scores: ScoreVector,
    pub classification: Classification,
    pub answered: usize,
    pub completeness: f64,
    pub details: AssessmentDetails,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuestionSetResponse {
    pub assessment: AssessmentKind,
    pub title: &'static str,
    pub instructions: &'static str,
    pub estimated_time_minutes: u32,
    pub total: usize,
    pub min_answers: usize,
    pub dimensions: &'static [&'static str],
    pub labels: &'static [&'static str],
    pub questions: &'static [Question],
}

impl From<&'static AssessmentDefinition> for QuestionSetResponse {
    fn from(def: &'static AssessmentDefinition) -> Self {
        Self {
            assessment: def.kind,
            title: def.title,
            instructions: def.instructions,
            estimated_time_minutes: def.estimated_time_minutes,
            total: def.questions.len(),
            min_answers: def.min_answers,
            dimensions: def.dimensions,
            labels: def.labels,
            questions: def.questions,
        }
    }
}
