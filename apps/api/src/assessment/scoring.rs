use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::definitions::AssessmentDefinition;
use crate::errors::AppError;

pub const SCALE_MIN: i64 = 1;
pub const SCALE_MAX: i64 = 5;
/// Emitted for a dimension that received no responses.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Question id → raw response. Any integer deserializes so out-of-range
/// answers reach the range check; non-integers are rejected at the body
/// extractor with the same validation envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    pub answers: BTreeMap<u32, i64>,
}

impl Submission {
    #[cfg(test)]
    pub fn new(answers: impl IntoIterator<Item = (u32, i64)>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

/// Dimension name → score on the 0–100 scale. Always holds every dimension
/// of the definition it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector(BTreeMap<String, f64>);

impl ScoreVector {
    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.0.get(dimension).copied()
    }

    /// Score for `dimension`, or the neutral default when absent.
    pub fn score(&self, dimension: &str) -> f64 {
        self.get(dimension).unwrap_or(NEUTRAL_SCORE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean across dimensions, one decimal.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return NEUTRAL_SCORE;
        }
        round1(self.0.values().sum::<f64>() / self.0.len() as f64)
    }
}

impl FromIterator<(String, f64)> for ScoreVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        ScoreVector(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSubmission {
    pub scores: ScoreVector,
    pub answered: usize,
    /// Answered / total questions × 100.
    pub completeness: f64,
}

/// Validates a submission against the definition, then computes the score vector.
///
/// Reversal is applied per response before averaging; the per-dimension mean
/// is rescaled from 1–5 to 0–100 via `(mean - 1) * 25`.
pub fn score_submission(
    definition: &AssessmentDefinition,
    submission: &Submission,
) -> Result<ScoredSubmission, AppError> {
    validate_submission(definition, submission)?;

    let mut buckets: BTreeMap<&str, Vec<i64>> = definition
        .dimensions
        .iter()
        .map(|d| (*d, Vec::new()))
        .collect();

    for question in definition.questions {
        let Some(&raw) = submission.answers.get(&question.id) else {
            continue;
        };
        let value = if question.reverse {
            (SCALE_MAX + SCALE_MIN) - raw
        } else {
            raw
        };
        buckets.entry(question.dimension).or_default().push(value);
    }

    let scores = buckets
        .into_iter()
        .map(|(dimension, values)| (dimension.to_string(), rescale(&values)))
        .collect();

    let answered = submission.answers.len();
    let completeness = round1(answered as f64 / definition.questions.len() as f64 * 100.0);

    Ok(ScoredSubmission {
        scores,
        answered,
        completeness,
    })
}

fn validate_submission(
    definition: &AssessmentDefinition,
    submission: &Submission,
) -> Result<(), AppError> {
    if let Some(unknown) = submission
        .answers
        .keys()
        .find(|id| definition.question(**id).is_none())
    {
        return Err(AppError::Validation(format!(
            "Unknown question id {unknown} for the {} assessment",
            definition.kind
        )));
    }

    let answered = submission.answers.len();
    if answered < definition.min_answers {
        return Err(AppError::Validation(format!(
            "Please answer at least {} questions (got {answered})",
            definition.min_answers
        )));
    }

    if let Some((id, value)) = submission
        .answers
        .iter()
        .find(|(_, v)| !(SCALE_MIN..=SCALE_MAX).contains(*v))
    {
        return Err(AppError::Validation(format!(
            "Invalid response {value} for question {id}: must be between {SCALE_MIN} and {SCALE_MAX}"
        )));
    }

    Ok(())
}

fn rescale(values: &[i64]) -> f64 {
    if values.is_empty() {
        return NEUTRAL_SCORE;
    }
    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    round1(((mean - SCALE_MIN as f64) * 25.0).clamp(0.0, 100.0))
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
