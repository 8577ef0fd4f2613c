//! Error handling for the bookshelf HTTP layer
//!
//! Every failure the API reports is a 400; the three kinds are told apart by
//! body shape: a JSON `errors` array for validation, plain text for unknown
//! ids, and a JSON `error` object for storage failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Where a rejected field was read from.
pub const LOCATION_BODY: &str = "body";

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The value as received; absent when the field was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub param: String,
    pub location: String,
}

impl FieldError {
    pub fn body(
        param: impl Into<String>,
        msg: impl Into<String>,
        value: Option<serde_json::Value>,
    ) -> Self {
        Self {
            value,
            msg: msg.into(),
            param: param.into(),
            location: LOCATION_BODY.to_string(),
        }
    }
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed for {count} field(s)", count = .errors.len())]
    Validation { errors: Vec<FieldError> },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    /// Create a not found error; `message` is sent verbatim as the body
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Wrap a storage failure
    pub fn database<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { errors } => {
                tracing::debug!(fields = errors.len(), "request failed validation");
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::NotFound { message } => {
                tracing::info!(%message, "requested book does not exist");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::Database(e) => {
                let error_id = Uuid::new_v4();
                let timestamp = OffsetDateTime::now_utc().to_string();

                tracing::error!(
                    error_id = %error_id,
                    error = %e,
                    "database operation failed"
                );

                let body = json!({
                    "error": {
                        "code": "database_error",
                        "message": e.to_string(),
                        "trace_id": error_id.to_string(),
                        "timestamp": timestamp
                    }
                });

                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn into_parts(err: AppError) -> (StatusCode, String, Vec<u8>) {
        let response = err.into_response();
        let status = response.status();
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, bytes.to_vec())
    }

    #[tokio::test]
    async fn validation_error_renders_errors_array() {
        let error = AppError::validation(vec![
            FieldError::body("title", "Should not be empty", Some(json!(""))),
            FieldError::body("year", "Should be number, not empty", None),
        ]);

        let (status, content_type, body) = into_parts(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("application/json"));

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            json!({
                "errors": [
                    {"value": "", "msg": "Should not be empty", "param": "title", "location": "body"},
                    {"msg": "Should be number, not empty", "param": "year", "location": "body"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn not_found_is_plain_text() {
        let (status, content_type, body) = into_parts(AppError::not_found("Book not found")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body, b"Book not found");
    }

    #[tokio::test]
    async fn database_error_carries_trace_id() {
        let error = AppError::Database(anyhow::anyhow!("connection reset"));
        let (status, _, body) = into_parts(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "database_error");
        assert_eq!(json["error"]["message"], "connection reset");
        assert!(Uuid::parse_str(json["error"]["trace_id"].as_str().unwrap()).is_ok());
        assert!(json["error"]["timestamp"].is_string());
    }

    #[test]
    fn validation_error_display_counts_fields() {
        let error = AppError::validation(vec![FieldError::body("id", "Should not be empty", None)]);
        assert_eq!(error.to_string(), "validation failed for 1 field(s)");
    }
}
