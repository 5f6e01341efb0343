//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Aide.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The intent classifier failed or produced nothing usable.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// The conversational responder or content generator failed.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The memory/context store could not be reached.
    #[error("Context store error: {0}")]
    Context(String),

    /// A web lookup (search page, snippets) failed.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Invalid dispatcher phase transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}
