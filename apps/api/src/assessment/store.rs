//! Persistence sink for assessment results, keyed by user id and assessment.
//!
//! `AppState` carries an `Arc<dyn ResultStore>`; the composition root builds
//! the Postgres-backed store from the shared pool.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::assessment::definitions::AssessmentKind;
use crate::assessment::models::AssessmentResult;
use crate::errors::AppError;
use crate::models::assessment::AssessmentResultRow;

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Inserts or wholesale-replaces the user's result for this assessment.
    async fn upsert(&self, result: &AssessmentResult) -> Result<(), AppError>;

    async fn fetch(
        &self,
        user_id: &str,
        kind: AssessmentKind,
    ) -> Result<Option<AssessmentResult>, AppError>;
}

#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn upsert(&self, result: &AssessmentResult) -> Result<(), AppError> {
        let document = serde_json::to_value(result).context("serializing assessment result")?;

        sqlx::query(
            r#"
            INSERT INTO assessment_results
                (user_id, assessment, label, classification_source, result, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, assessment) DO UPDATE SET
                label = EXCLUDED.label,
                classification_source = EXCLUDED.classification_source,
                result = EXCLUDED.result,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(&result.user_id)
        .bind(result.assessment.as_str())
        .bind(result.classification.label())
        .bind(result.classification.source())
        .bind(&document)
        .bind(result.completed_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Stored {} result for user {} ({})",
            result.assessment,
            result.user_id,
            result.classification.label()
        );
        Ok(())
    }

    async fn fetch(
        &self,
        user_id: &str,
        kind: AssessmentKind,
    ) -> Result<Option<AssessmentResult>, AppError> {
        let row = sqlx::query_as::<_, AssessmentResultRow>(
            "SELECT * FROM assessment_results WHERE user_id = $1 AND assessment = $2",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            serde_json::from_value(r.result)
                .with_context(|| format!("decoding stored {kind} result for user {user_id}"))
                .map_err(AppError::Internal)
        })
        .transpose()
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory store used by handler and aggregator tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryResultStore {
        results: Mutex<HashMap<(String, AssessmentKind), AssessmentResult>>,
        failing: HashSet<AssessmentKind>,
    }

    impl InMemoryResultStore {
        /// Every call touching `kind` fails with a database-style error.
        pub fn failing_for(kinds: &[AssessmentKind]) -> Self {
            Self {
                results: Mutex::default(),
                failing: kinds.iter().copied().collect(),
            }
        }

        pub fn len(&self) -> usize {
            self.results.lock().unwrap().len()
        }

        fn check(&self, kind: AssessmentKind) -> Result<(), AppError> {
            if self.failing.contains(&kind) {
                return Err(AppError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResultStore for InMemoryResultStore {
        async fn upsert(&self, result: &AssessmentResult) -> Result<(), AppError> {
            self.check(result.assessment)?;
            self.results
                .lock()
                .unwrap()
                .insert((result.user_id.clone(), result.assessment), result.clone());
            Ok(())
        }

        async fn fetch(
            &self,
            user_id: &str,
            kind: AssessmentKind,
        ) -> Result<Option<AssessmentResult>, AppError> {
            self.check(kind)?;
            Ok(self
                .results
                .lock()
                .unwrap()
                .get(&(user_id.to_string(), kind))
                .cloned())
        }
    }
}
