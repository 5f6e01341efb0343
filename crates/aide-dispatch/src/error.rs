//! Error types for handlers and OS effects.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the platform seam (process spawns, OS queries).
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The helper program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper program ran but reported failure.
    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The helper program's output could not be understood.
    #[error("Unexpected output from '{program}': {output}")]
    Parse { program: String, output: String },

    /// No way to perform this effect on the current OS.
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),
}

/// Errors raised inside an action handler.
///
/// The dispatcher turns these into failed `ActionResult`s; they never cross
/// the batch boundary.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Platform(#[from] PlatformError),

    #[error("No application matches '{0}'")]
    AppNotFound(String),

    #[error("Web lookup failed: {0}")]
    Lookup(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown system command: {0}")]
    UnknownCommand(String),

    #[error("Invalid reminder time '{0}', expected YYYY-MM-DD HH:MM")]
    InvalidDateTime(String),

    #[error("Handler timed out after {0:?}")]
    Timeout(Duration),

    #[error("Handler task failed: {0}")]
    Join(String),
}
