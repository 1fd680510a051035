use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Server-side failures are reported with a correlation id only; the
/// underlying detail goes to the log under the same id.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{service} error: {message}")]
    Dependency {
        service: &'static str,
        message: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn dependency(service: &'static str, message: impl Into<String>) -> Self {
        AppError::Dependency {
            service,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Dependency { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `axum::Json` extractor whose rejections use the `AppError` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(msg) => client_error("NOT_FOUND", msg),
            AppError::Validation(msg) => client_error("VALIDATION_ERROR", msg),
            AppError::Database(e) => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "Database error: {e}");
                server_error("DATABASE_ERROR", "A database error occurred", correlation_id)
            }
            AppError::Dependency { service, message } => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, service, "Dependency error: {message}");
                server_error(
                    "DEPENDENCY_ERROR",
                    "An upstream service is unavailable",
                    correlation_id,
                )
            }
            AppError::Internal(e) => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "Internal error: {e:?}");
                server_error(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    correlation_id,
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn client_error(code: &str, message: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

fn server_error(code: &str, message: &str, correlation_id: Uuid) -> serde_json::Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "correlation_id": correlation_id.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_400_with_message() {
        let (status, body) = body_json(AppError::Validation("bad answers".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "bad answers");
        assert!(body["error"].get("correlation_id").is_none());
    }

    #[tokio::test]
    async fn test_json_body_rejection_is_validation_error() {
        let request = axum::http::Request::post("/")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"n": 1.5}"#))
            .unwrap();
        let err = JsonBody::<std::collections::HashMap<String, i64>>::from_request(request, &())
            .await
            .unwrap_err();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_json(AppError::NotFound("no result".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dependency_hides_detail_behind_correlation_id() {
        let err = AppError::dependency("vector-index", "connection reset by peer at 10.0.0.3");
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DEPENDENCY_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("10.0.0.3"));
        let id = body["error"]["correlation_id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
