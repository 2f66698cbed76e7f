use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

/// Structured error hierarchy for `reflectd`.
///
/// Only `MalformedRequest` and `ValidationFailed` are user-visible failure
/// modes; an unavailable external provider is never one of them — it
/// degrades to the heuristic strategy instead. `Internal` covers the
/// strategy chain coming up empty, which the heuristic's total-function
/// contract makes unreachable in practice.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl ReflectError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReflectError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
