//! Persona aggregation: merges a user's stored assessment results into one
//! profile.
//!
//! Both stored results are read concurrently. A failed read is logged and the
//! source reported unavailable; the other source is still used.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::assessment::definitions::AssessmentKind;
use crate::assessment::models::AssessmentResult;
use crate::assessment::profile::AssessmentDetails;
use crate::assessment::store::ResultStore;
use crate::errors::AppError;
use crate::persona::cache::PersonaCache;
use crate::persona::models::{DataSources, Persona, Personality};

const TOTAL_SOURCES: usize = 2;

/// Cache-aware entry point. A cached persona is returned unless
/// `force_refresh`; a freshly built one is written back unless degraded.
pub async fn load_persona(
    store: &dyn ResultStore,
    cache: Option<&dyn PersonaCache>,
    cache_ttl: Duration,
    user_id: &str,
    force_refresh: bool,
) -> Result<Persona, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }

    if let (Some(cache), false) = (cache, force_refresh) {
        if let Some(persona) = cache.get(user_id).await {
            return Ok(persona);
        }
    }

    let persona = aggregate(store, user_id).await?;

    match cache {
        Some(cache) if !persona.degraded => cache.put(&persona, cache_ttl).await,
        Some(_) => warn!("Not caching degraded persona for {user_id}"),
        None => {}
    }
    Ok(persona)
}

pub async fn aggregate(store: &dyn ResultStore, user_id: &str) -> Result<Persona, AppError> {
    let (work_style, empathy) = tokio::join!(
        store.fetch(user_id, AssessmentKind::WorkStyle),
        store.fetch(user_id, AssessmentKind::Empathy),
    );

    let mut failures = 0;
    let mut isolate = |kind: AssessmentKind, read: Result<Option<AssessmentResult>, AppError>| {
        read.unwrap_or_else(|e| {
            warn!("Persona source {kind} unavailable for {user_id}: {e}");
            failures += 1;
            None
        })
    };
    let work_style = isolate(AssessmentKind::WorkStyle, work_style);
    let empathy = isolate(AssessmentKind::Empathy, empathy);

    if work_style.is_none() && empathy.is_none() {
        return Err(if failures > 0 {
            AppError::dependency("result-store", "assessment results could not be read")
        } else {
            AppError::NotFound(format!("No assessment results found for user {user_id}"))
        });
    }

    let mut persona = build_persona(user_id, work_style.as_ref(), empathy.as_ref());
    persona.degraded = failures > 0;
    info!(
        "Persona aggregated for {user_id}: {:.0}% complete",
        persona.completeness * 100.0
    );
    Ok(persona)
}

fn build_persona(
    user_id: &str,
    work_style: Option<&AssessmentResult>,
    empathy: Option<&AssessmentResult>,
) -> Persona {
    let data_sources = DataSources {
        work_style: work_style.is_some(),
        empathy: empathy.is_some(),
    };

    let mut personality = Personality::default();
    let mut career_suggestions = Vec::new();

    if let Some(result) = work_style {
        personality.big_five = result.scores.clone();
        personality.work_style = Some(result.classification.label().to_string());
        if let AssessmentDetails::WorkStyle {
            career_suggestions: suggestions,
            ..
        } = &result.details
        {
            career_suggestions = suggestions.clone();
        }
    }

    if let Some(result) = empathy {
        personality.team_role = Some(result.classification.label().to_string());
        match &result.details {
            AssessmentDetails::Empathy {
                empathy_score,
                empathy_level,
            } => {
                personality.empathy_score = Some(*empathy_score);
                personality.empathy_level = Some(empathy_level.clone());
            }
            AssessmentDetails::WorkStyle { .. } => {
                personality.empathy_score = Some(result.scores.mean());
            }
        }
    }

    let completeness = data_sources.available() as f64 / TOTAL_SOURCES as f64;

    Persona {
        user_id: user_id.to_string(),
        data_sources,
        personality,
        completeness,
        career_suggestions,
        degraded: false,
        generated_at: Utc::now(),
    }
}
