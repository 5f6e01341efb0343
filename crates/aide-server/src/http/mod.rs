//! HTTP server for the assistant.
//!
//! Provides endpoints for:
//! - Instruction dispatch (`/v1/dispatch`)
//! - Assistant status for polling UIs (`/v1/status`, `/v1/status.json`)
//! - Reminder creation (`/v1/reminders`)
//! - Health check (`/health`)

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer for browser front ends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/v1/dispatch", post(handlers::dispatch))
        .route("/v1/reminders", post(handlers::create_reminder))
        // Status routes
        .route("/v1/status", get(handlers::status_text))
        .route("/v1/status.json", get(handlers::status_json))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
