//! HTTP request and response types.

use serde::{Deserialize, Serialize};

use aide_core::{ActionResult, AssistantStatus, DispatchOutcome};

// ============================================================================
// Dispatch types
// ============================================================================

/// Request body for `POST /v1/dispatch`.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    /// Raw user utterance.
    pub instruction: String,
}

/// Response body for `POST /v1/dispatch`.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub dispatch_id: String,
    pub automations_run: Vec<ActionResult>,
    pub conversational_reply: Option<String>,
    pub should_exit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            dispatch_id: outcome.dispatch_id.into_inner(),
            automations_run: outcome.automations_run,
            conversational_reply: outcome.conversational_reply,
            should_exit: outcome.should_exit,
            unrecognized: outcome.unrecognized,
        }
    }
}

// ============================================================================
// Status types
// ============================================================================

/// Response body for `GET /v1/status.json`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Display text, e.g. `"Thinking..."`.
    pub status: String,
    pub is_listening: bool,
    pub is_thinking: bool,
    pub is_answering: bool,
}

impl From<AssistantStatus> for StatusResponse {
    fn from(status: AssistantStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
            is_listening: status == AssistantStatus::Listening,
            is_thinking: matches!(status, AssistantStatus::Thinking | AssistantStatus::Searching),
            is_answering: status == AssistantStatus::Answering,
        }
    }
}

// ============================================================================
// Reminder types
// ============================================================================

/// Request body for `POST /v1/reminders`.
#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    /// Start time as `YYYY-MM-DD HH:MM`.
    pub datetime: String,

    /// Event summary.
    pub message: String,
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
