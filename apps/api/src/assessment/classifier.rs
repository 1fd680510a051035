//! Classification: maps a score vector to one label of the assessment's
//! fixed set.
//!
//! A `NarrativeProvider` (the generative model by default) is tried first for a
//! richer write-up. Any failure there (timeout, transport, malformed output, a
//! label outside the set) degrades to the deterministic threshold table. The
//! caller always gets a label; `Classification` records which path produced it.
//!
//! `AppState` holds the provider as `Arc<dyn NarrativeProvider>`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::assessment::definitions::{AssessmentDefinition, Condition};
use crate::assessment::prompts::build_classify_prompt;
use crate::assessment::scoring::ScoreVector;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub label: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub growth_areas: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Outcome of classification. Both variants carry a label from the fixed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Classification {
    AiEnhanced {
        label: String,
        narrative: Narrative,
    },
    RuleBased {
        label: String,
        narrative: Narrative,
        fallback_reason: String,
    },
}

impl Classification {
    pub fn label(&self) -> &str {
        match self {
            Classification::AiEnhanced { label, .. } | Classification::RuleBased { label, .. } => {
                label
            }
        }
    }

    #[cfg(test)]
    pub fn narrative(&self) -> &Narrative {
        match self {
            Classification::AiEnhanced { narrative, .. }
            | Classification::RuleBased { narrative, .. } => narrative,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Classification::AiEnhanced { .. } => "ai_enhanced",
            Classification::RuleBased { .. } => "rule_based",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider trait
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative provider disabled")]
    Disabled,

    #[error("narrative call timed out after {0:?}")]
    Timeout(Duration),

    #[error("narrative call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("narrative label '{0}' is not in the assessment's label set")]
    UnknownLabel(String),
}

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn narrate(
        &self,
        definition: &AssessmentDefinition,
        scores: &ScoreVector,
    ) -> Result<Narrative, NarrativeError>;
}

/// Calls the generative model through `LlmClient`.
pub struct LlmNarrator(pub LlmClient);

#[async_trait]
impl NarrativeProvider for LlmNarrator {
    async fn narrate(
        &self,
        definition: &AssessmentDefinition,
        scores: &ScoreVector,
    ) -> Result<Narrative, NarrativeError> {
        let prompt = build_classify_prompt(definition, scores);
        let narrative: Narrative = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        Ok(narrative)
    }
}

/// Used when no model credentials are configured.
pub struct DisabledNarrator;

#[async_trait]
impl NarrativeProvider for DisabledNarrator {
    async fn narrate(
        &self,
        _definition: &AssessmentDefinition,
        _scores: &ScoreVector,
    ) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Disabled)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

pub async fn classify(
    definition: &AssessmentDefinition,
    scores: &ScoreVector,
    provider: &dyn NarrativeProvider,
    timeout: Duration,
) -> Classification {
    let attempt = match tokio::time::timeout(timeout, provider.narrate(definition, scores)).await
    {
        Ok(result) => result,
        Err(_) => Err(NarrativeError::Timeout(timeout)),
    };

    match attempt.and_then(|n| canonicalize_label(definition, n)) {
        Ok(narrative) => {
            debug!(
                "Narrative classification for {}: {}",
                definition.kind, narrative.label
            );
            Classification::AiEnhanced {
                label: narrative.label.clone(),
                narrative,
            }
        }
        Err(err) => {
            if !matches!(err, NarrativeError::Disabled) {
                warn!(
                    "Narrative classification for {} failed, using threshold table: {err}",
                    definition.kind
                );
            }
            rule_based(definition, scores, err.to_string())
        }
    }
}

/// Deterministic classification from the threshold table alone.
pub fn rule_based(
    definition: &AssessmentDefinition,
    scores: &ScoreVector,
    fallback_reason: String,
) -> Classification {
    let label = evaluate_rules(definition, scores);
    Classification::RuleBased {
        label: label.to_string(),
        narrative: Narrative {
            label: label.to_string(),
            interpretation: interpretation_for(label).to_string(),
            strengths: vec![],
            growth_areas: vec![],
            recommendations: vec![],
        },
        fallback_reason,
    }
}

/// First rule whose conditions all hold, else the definition's default label.
pub fn evaluate_rules(definition: &AssessmentDefinition, scores: &ScoreVector) -> &'static str {
    definition
        .rules
        .iter()
        .find(|rule| rule.conditions.iter().all(|c| holds(c, scores)))
        .map(|rule| rule.label)
        .unwrap_or(definition.default_label)
}

fn holds(condition: &Condition, scores: &ScoreVector) -> bool {
    match *condition {
        Condition::Above(dimension, threshold) => scores.score(dimension) > threshold,
        Condition::Below(dimension, threshold) => scores.score(dimension) < threshold,
    }
}

/// Accepts the model's label only if it names one of the fixed labels
/// (case-insensitive), rewriting it to the canonical spelling.
fn canonicalize_label(
    definition: &AssessmentDefinition,
    mut narrative: Narrative,
) -> Result<Narrative, NarrativeError> {
    let wanted = narrative.label.trim();
    match definition
        .labels
        .iter()
        .find(|l| l.eq_ignore_ascii_case(wanted))
    {
        Some(canonical) => {
            narrative.label = canonical.to_string();
            Ok(narrative)
        }
        None => Err(NarrativeError::UnknownLabel(narrative.label)),
    }
}

fn interpretation_for(label: &str) -> &'static str {
    match label {
        "Leader" => "You combine visible initiative with follow-through and tend to set direction for others.",
        "Collaborator" => "You do your best work alongside others and actively support your team's success.",
        "Analyst" | "Analyzer" => "You approach people and problems thoughtfully, weighing perspectives before acting.",
        "Mediator" => "You are attuned to how others feel and help teams work through tension.",
        "Innovator" => "You are drawn to new ideas and prefer freedom over rigid structure.",
        "Organizer" => "You bring structure and reliability, preferring proven methods to experimentation.",
        "Balanced" => "Your work style is balanced across all traits.",
        _ => "You contribute steadily across communication, action, reflection and feeling.",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
