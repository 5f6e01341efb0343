//! Error types for the chat-completion client.

use thiserror::Error;

/// Errors that can occur while talking to the completion API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured.
    #[error("API key not set. Export AIDE_LLM_API_KEY or GROQ_API_KEY, or add it to .env.")]
    MissingApiKey,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed server-sent event stream.
    #[error("Stream error: {0}")]
    Stream(String),

    /// The API returned no choices or no text.
    #[error("Empty response from model")]
    EmptyResponse,
}
