//! Instruction dispatch handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::http::responses::{DispatchRequest, DispatchResponse};
use crate::state::AppState;

/// Dispatch one instruction and return its outcome.
///
/// An outcome with `should_exit` also signals server shutdown.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    json_result: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let Json(req) = json_result.map_err(|rejection| {
        warn!(error = %rejection, "Invalid JSON in request body");
        ApiError::InvalidJson(rejection.body_text())
    })?;

    let instruction = req.instruction.trim();
    if instruction.is_empty() {
        return Err(ApiError::EmptyField { field: "instruction" });
    }

    let outcome = state.dispatcher.dispatch(instruction).await?;

    if outcome.should_exit {
        info!(dispatch_id = %outcome.dispatch_id, "Exit requested over HTTP, shutting down");
        state.shutdown.notify_one();
    }

    Ok(Json(outcome.into()))
}
