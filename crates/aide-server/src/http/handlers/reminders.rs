//! Reminder creation handler.

use std::sync::Arc;

use aide_core::ActionResult;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::error::ApiError;
use crate::http::responses::ReminderRequest;
use crate::state::AppState;

/// Write a reminder file and open it with the calendar handler.
///
/// An unparsable time is reported as a failed `ActionResult` with 422.
pub async fn create_reminder(
    State(state): State<Arc<AppState>>,
    json_result: Result<Json<ReminderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResult>), ApiError> {
    let Json(req) = json_result.map_err(|rejection| {
        warn!(error = %rejection, "Invalid JSON in request body");
        ApiError::InvalidJson(rejection.body_text())
    })?;

    if req.message.trim().is_empty() {
        return Err(ApiError::EmptyField { field: "message" });
    }

    let result = aide_dispatch::create_reminder(
        &state.reminders_dir,
        state.opener.as_ref(),
        &req.datetime,
        req.message.trim(),
    )
    .await;

    let status = if result.success {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(result)))
}
