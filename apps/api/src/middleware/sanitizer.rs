//! Request-body sanitiser applied to every JSON write request.
//!
//! Strings anywhere in the JSON document are stripped of markup and
//! script-injection patterns before any handler sees them. Object keys are
//! left alone.

use std::sync::LazyLock;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;

pub const MAX_STRING_CHARS: usize = 10_000;
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static IFRAME_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static JS_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").unwrap());
static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn sanitize_string(input: &str) -> String {
    let truncated: String = input.chars().take(MAX_STRING_CHARS).collect();

    let s = SCRIPT_BLOCK.replace_all(&truncated, "");
    let s = IFRAME_BLOCK.replace_all(&s, "");
    let s = HTML_TAG.replace_all(&s, "");
    let s = JS_PROTOCOL.replace_all(&s, "");
    let s = EVENT_HANDLER.replace_all(&s, "");
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}

fn is_json_write(request: &Request) -> bool {
    let method = request.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return false;
    }
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

/// axum `from_fn` middleware. Bodies that are not valid JSON are forwarded
/// untouched so the handler's extractor reports the parse error.
pub async fn sanitize_json_body(request: Request, next: Next) -> Result<Response, AppError> {
    if !is_json_write(&request) {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| {
            AppError::Validation(format!(
                "Request body exceeds {MAX_BODY_BYTES} bytes"
            ))
        })?;

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => match serde_json::to_vec(&sanitize_value(value)) {
            Ok(cleaned) => {
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(cleaned.len()));
                Body::from(cleaned)
            }
            Err(e) => {
                warn!("Failed to re-serialise sanitised body: {e}");
                Body::from(bytes)
            }
        },
        Err(_) => Body::from(bytes),
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use serde_json::json;
    use tower::ServiceExt;

    #[test]
    fn test_script_blocks_removed_with_content() {
        assert_eq!(
            sanitize_string("hello <script>alert('x')</script> world"),
            "hello world"
        );
        assert_eq!(
            sanitize_string("a<IFRAME src=\"evil\">\ninner</iframe>b"),
            "ab"
        );
    }

    #[test]
    fn test_tags_and_handlers_stripped() {
        assert_eq!(sanitize_string("<b>bold</b> text"), "bold text");
        assert_eq!(sanitize_string("JavaScript:doThing()"), "doThing()");
        assert_eq!(sanitize_string("x onclick=steal() y"), "x steal() y");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(sanitize_string("  many   \n\t spaces  "), "many spaces");
    }

    #[test]
    fn test_truncated_to_limit() {
        let long = "a".repeat(MAX_STRING_CHARS + 500);
        assert_eq!(sanitize_string(&long).chars().count(), MAX_STRING_CHARS);
    }

    #[test]
    fn test_value_recursion_keeps_keys_and_numbers() {
        let cleaned = sanitize_value(json!({
            "<b>key</b>": "<i>v</i>",
            "answers": {"1": 5},
            "list": ["<p>x</p>", 3, null, true]
        }));
        assert_eq!(
            cleaned,
            json!({
                "<b>key</b>": "v",
                "answers": {"1": 5},
                "list": ["x", 3, null, true]
            })
        );
    }

    fn echo_app() -> Router {
        Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn(sanitize_json_body))
    }

    async fn send(content_type: &str, body: impl Into<Body>) -> (StatusCode, String) {
        let response = echo_app()
            .oneshot(
                axum::http::Request::post("/echo")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_json_body_rewritten() {
        let (status, body) = send(
            "application/json",
            r#"{"user_id":"<script>x</script>u-1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, json!({"user_id": "u-1"}));
    }

    #[tokio::test]
    async fn test_invalid_json_passes_through() {
        let (status, body) = send("application/json", "{not json <b>").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "{not json <b>");
    }

    #[tokio::test]
    async fn test_non_json_untouched() {
        let (_, body) = send("text/plain", "<b>raw</b>").await;
        assert_eq!(body, "<b>raw</b>");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let payload = format!(r#"{{"x":"{}"}}"#, "a".repeat(MAX_BODY_BYTES));
        let (status, _) = send("application/json", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
