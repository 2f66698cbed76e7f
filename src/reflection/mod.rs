//! Request/response types for the reflection core.
//!
//! Entities here are transient: nothing outlives a single request/response
//! cycle, and the service persists nothing. The caller owns storage and the
//! association of a result with its `entryId`.

pub mod heuristic;
pub mod service;

pub use heuristic::HeuristicStrategy;
pub use service::ReflectionService;

use serde::{Deserialize, Serialize};

use crate::error::ReflectError;

/// A journal entry submitted for reflection.
#[derive(Debug, Clone, Deserialize)]
pub struct ReflectionRequest {
    /// Caller-supplied identifier, opaque to this service.
    #[serde(rename = "entryId")]
    pub entry_id: String,
    /// Optional free-text goal; absent and `null` are both treated as empty.
    #[serde(default)]
    pub goal: Option<String>,
    /// The journal entry body.
    pub content: String,
}

impl ReflectionRequest {
    /// Enforce the request invariant: `entryId` and `content` must be
    /// non-empty after trimming.
    pub fn validate(&self) -> Result<(), ReflectError> {
        if self.entry_id.trim().is_empty() {
            return Err(ReflectError::ValidationFailed(
                "entryId is required".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(ReflectError::ValidationFailed(
                "content is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Goal text for downstream logic: trimmed, empty when absent.
    pub fn goal_text(&self) -> &str {
        self.goal.as_deref().map(str::trim).unwrap_or_default()
    }
}

/// The generated reflection/action pair returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionResult {
    pub reflection: String,
    /// Suggested next step. Always present from the heuristic strategy; an
    /// external strategy may omit it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Coarse sentiment classification used to select phrasing. Derived per
/// request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Upbeat,
    Stressed,
    Steady,
}
