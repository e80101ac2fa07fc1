//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into HTTP responses with a JSON body and status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contact_identity_core::{FieldError, ValidationErrors};
use contact_identity_service::ServiceError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON `{"error": "message"}`; validation failures add an
/// `errors` array with one entry per rejected field.
///
/// `Internal` logs the real error server-side and returns a static message.
#[derive(Debug)]
pub enum ApiError {
    /// 400, malformed body.
    BadRequest(String),
    /// 400, well-formed body with rejected fields.
    Validation(Vec<FieldError>),
    /// 403, admin endpoint while admin is disabled.
    Forbidden(String),
    /// 409, a concurrent request created the same contact first.
    Conflict(String),
    /// 500, storage or integrity failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg})),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "validation failed", "errors": errors}),
            ),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, serde_json::json!({"error": msg})),
            Self::Conflict(msg) => (StatusCode::CONFLICT, serde_json::json!({"error": msg})),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "internal server error"}),
                )
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.0)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_conflict() {
            return Self::Conflict(
                "contact was created concurrently, retry the request".to_owned(),
            );
        }
        Self::Internal(err.into())
    }
}
