//! Aggregate result of dispatching one instruction.

use serde::{Deserialize, Serialize};

use crate::action::ActionResult;
use crate::ids::DispatchId;

/// What the dispatcher hands back to the voice loop, chat loop or HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Identifier used in logs for this instruction.
    pub dispatch_id: DispatchId,

    /// One entry per automation handler that ran.
    pub automations_run: Vec<ActionResult>,

    /// Merged conversational answer, or the farewell on exit.
    pub conversational_reply: Option<String>,

    /// The host should shut down.
    pub should_exit: bool,

    /// Sub-instructions that matched no prefix and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
}

impl DispatchOutcome {
    /// Create an empty outcome.
    pub fn new(dispatch_id: DispatchId) -> Self {
        Self {
            dispatch_id,
            automations_run: Vec::new(),
            conversational_reply: None,
            should_exit: false,
            unrecognized: Vec::new(),
        }
    }

    /// Returns true if every automation reported success.
    pub fn all_succeeded(&self) -> bool {
        self.automations_run.iter().all(|r| r.success)
    }
}
