use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::assessment::classifier::{classify, NarrativeProvider};
use crate::assessment::definitions::{definition, AssessmentKind};
use crate::assessment::models::{AssessmentResult, SubmitRequest};
use crate::assessment::profile::{empathy_details, work_style_details};
use crate::assessment::scoring::score_submission;
use crate::assessment::store::ResultStore;
use crate::errors::AppError;

/// Full workflow: validate → score → classify → upsert → return.
///
/// Validation failures return before the narrative provider or the store are
/// touched. A store failure is surfaced; the computed result is not returned
/// as if it had been saved.
pub async fn process_submission(
    kind: AssessmentKind,
    request: SubmitRequest,
    narrator: &dyn NarrativeProvider,
    narrative_timeout: Duration,
    store: &dyn ResultStore,
) -> Result<AssessmentResult, AppError> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }

    let def = definition(kind);
    let scored = score_submission(def, &request.answers)?;

    let classification = classify(def, &scored.scores, narrator, narrative_timeout).await;

    let details = match kind {
        AssessmentKind::WorkStyle => work_style_details(&scored.scores),
        AssessmentKind::Empathy => empathy_details(&scored.scores),
    };

    let result = AssessmentResult {
        user_id: user_id.to_string(),
        assessment: kind,
        scores: scored.scores,
        classification,
        answered: scored.answered,
        completeness: scored.completeness,
        details,
        completed_at: Utc::now(),
    };

    store.upsert(&result).await?;

    info!(
        "Processed {kind} submission for user {}: {} ({})",
        result.user_id,
        result.classification.label(),
        result.classification.source()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::classifier::DisabledNarrator;
    use crate::assessment::profile::AssessmentDetails;
    use crate::assessment::scoring::Submission;
    use crate::assessment::store::testing::InMemoryResultStore;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn request(user_id: &str, answers: impl IntoIterator<Item = (u32, i64)>) -> SubmitRequest {
        SubmitRequest {
            user_id: user_id.to_string(),
            answers: Submission::new(answers),
        }
    }

    #[tokio::test]
    async fn test_empathy_midpoint_submission_end_to_end() {
        let store = InMemoryResultStore::default();
        let result = process_submission(
            AssessmentKind::Empathy,
            request("user-1", (1..=20).map(|id| (id, 3))),
            &DisabledNarrator,
            TIMEOUT,
            &store,
        )
        .await
        .unwrap();

        for (_, score) in result.scores.iter() {
            assert_eq!(score, 50.0);
        }
        assert_eq!(result.classification.label(), "Contributor");
        assert_eq!(
            result.details,
            AssessmentDetails::Empathy {
                empathy_score: 50.0,
                empathy_level: "Moderately Empathetic".to_string()
            }
        );

        let stored = store
            .fetch("user-1", AssessmentKind::Empathy)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, result);
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_store() {
        let store = InMemoryResultStore::default();
        let err = process_submission(
            AssessmentKind::Empathy,
            request("user-1", (1..=14).map(|id| (id, 3))),
            &DisabledNarrator,
            TIMEOUT,
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_blank_user_id_rejected() {
        let store = InMemoryResultStore::default();
        let err = process_submission(
            AssessmentKind::WorkStyle,
            request("   ", (1..=25).map(|id| (id, 3))),
            &DisabledNarrator,
            TIMEOUT,
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resubmission_replaces_previous_result() {
        let store = InMemoryResultStore::default();
        for value in [2, 4] {
            process_submission(
                AssessmentKind::WorkStyle,
                request("user-9", (1..=25).map(|id| (id, value))),
                &DisabledNarrator,
                TIMEOUT,
                &store,
            )
            .await
            .unwrap();
        }
        assert_eq!(store.len(), 1);
        let stored = store
            .fetch("user-9", AssessmentKind::WorkStyle)
            .await
            .unwrap()
            .unwrap();
        // q1 (forward) answered 4 on the second pass; q2 (reversed) 4 → 2.
        // extraversion mean = (4+2+4+2+4)/5 = 3.2 → 55.0
        assert_eq!(stored.scores.get("extraversion"), Some(55.0));
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let store = InMemoryResultStore::failing_for(&[AssessmentKind::WorkStyle]);
        let err = process_submission(
            AssessmentKind::WorkStyle,
            request("user-1", (1..=25).map(|id| (id, 3))),
            &DisabledNarrator,
            TIMEOUT,
            &store,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
