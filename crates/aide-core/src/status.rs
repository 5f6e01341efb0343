//! Assistant status and dispatcher phases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Process-wide assistant status, polled by front-ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssistantStatus {
    /// Waiting for the user to speak or type.
    Listening,
    /// Classifying or generating a reply.
    Thinking,
    /// Gathering real-time information.
    Searching,
    /// Delivering a reply.
    Answering,
    /// Idle and ready.
    #[default]
    Available,
    /// Shut down after an exit request.
    Off,
}

impl AssistantStatus {
    /// Plain-text label shown by polling UIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listening => "Listening...",
            Self::Thinking => "Thinking...",
            Self::Searching => "Searching...",
            Self::Answering => "Answering...",
            Self::Available => "Available...",
            Self::Off => "Off",
        }
    }
}

impl fmt::Display for AssistantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of the dispatcher state machine for one instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchPhase {
    #[default]
    Idle,
    Classifying,
    Dispatching,
    Collecting,
    Responding,
    /// Classifier failed; nothing was dispatched.
    Failed,
}

impl DispatchPhase {
    /// Returns true if `next` is a legal successor of this phase.
    pub fn can_transition_to(&self, next: DispatchPhase) -> bool {
        use DispatchPhase::*;
        matches!(
            (*self, next),
            (Idle, Classifying)
                | (Classifying, Dispatching)
                | (Classifying, Failed)
                | (Dispatching, Collecting)
                | (Collecting, Responding)
                | (Responding, Idle)
                | (Failed, Idle)
        )
    }

    /// Move to `next`, rejecting illegal transitions.
    pub fn transition(self, next: DispatchPhase) -> Result<DispatchPhase, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStateTransition {
                from: format!("{:?}", self),
                to: format!("{:?}", next),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let phase = DispatchPhase::Idle
            .transition(DispatchPhase::Classifying)
            .and_then(|p| p.transition(DispatchPhase::Dispatching))
            .and_then(|p| p.transition(DispatchPhase::Collecting))
            .and_then(|p| p.transition(DispatchPhase::Responding))
            .and_then(|p| p.transition(DispatchPhase::Idle))
            .unwrap();
        assert_eq!(phase, DispatchPhase::Idle);
    }

    #[test]
    fn test_failure_skips_dispatch() {
        let failed = DispatchPhase::Classifying
            .transition(DispatchPhase::Failed)
            .unwrap();
        assert!(matches!(
            failed.transition(DispatchPhase::Dispatching),
            Err(CoreError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(AssistantStatus::default(), AssistantStatus::Available);
        assert_eq!(AssistantStatus::Listening.to_string(), "Listening...");
        assert_eq!(AssistantStatus::Off.to_string(), "Off");
    }
}
