use axum::{
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::AppState;
use crate::error::ReflectError;
use crate::reflection::{ReflectionRequest, ReflectionResult};

/// GET /health — liveness probe; reports key presence, never the key.
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "external_strategy": state.external_strategy,
    }))
}

/// POST /reflect — the single generation endpoint.
pub(super) async fn handle_reflect(
    State(state): State<AppState>,
    body: Result<Json<ReflectionRequest>, JsonRejection>,
) -> Result<Json<ReflectionResult>, ReflectError> {
    let Json(request) = body.map_err(map_rejection)?;
    let result = state.service.handle(&request).await?;
    Ok(Json(result))
}

/// OPTIONS /reflect — pre-flight; CORS headers are added by the middleware.
pub(super) async fn handle_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any other method on /reflect.
pub(super) async fn handle_method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "method not allowed" })),
    )
}

/// A body that cannot be parsed at all is malformed (400); a body that
/// parses but is missing or mistypes a required field fails validation
/// (422), matching what the explicit trim checks produce.
fn map_rejection(rejection: JsonRejection) -> ReflectError {
    match rejection {
        JsonRejection::JsonDataError(e) => ReflectError::ValidationFailed(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => ReflectError::MalformedRequest(e.body_text()),
        other => ReflectError::MalformedRequest(other.body_text()),
    }
}
