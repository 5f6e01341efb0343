//! Assistant status handlers for polling UIs.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::http::responses::StatusResponse;
use crate::state::AppState;

/// Current status as plain text, e.g. `Available...`.
pub async fn status_text(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.dispatcher.current_status().as_str()
}

/// Current status with convenience flags.
pub async fn status_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse::from(state.dispatcher.current_status()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::test_support::test_state;
    use aide_core::AssistantStatus;

    #[tokio::test]
    async fn test_status_follows_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        state.dispatcher.set_status(AssistantStatus::Listening);
        let response = StatusResponse::from(state.dispatcher.current_status());
        assert_eq!(response.status, "Listening...");
        assert!(response.is_listening);
        assert!(!response.is_thinking);

        let text = status_text(State(state)).await.into_response();
        let bytes = axum::body::to_bytes(text.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"Listening...");
    }
}
