//! Outcome of one handler invocation.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Result of running one automation handler.
///
/// Created when the handler finishes, consumed by the dispatcher and returned
/// to the caller. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Category of the sub-instruction that produced this result.
    pub category: Category,

    /// Argument the handler was invoked with.
    pub argument: String,

    /// Whether the effect was carried out.
    pub success: bool,

    /// Confirmation or failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    /// Create a successful result.
    pub fn success(category: Category, argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            argument: argument.into(),
            success: true,
            message: Some(message.into()),
        }
    }

    /// Create a failed result.
    pub fn failure(category: Category, argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            category,
            argument: argument.into(),
            success: false,
            message: Some(reason.into()),
        }
    }
}
