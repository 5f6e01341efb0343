//! HTTP API errors.

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use aide_core::CoreError;

use crate::http::responses::ErrorResponse;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not valid JSON or had the wrong shape.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// A required field was empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// The intent classifier failed for this instruction.
    #[error("could not understand the instruction: {0}")]
    Classification(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Classification(message) => Self::Classification(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::EmptyField { .. } => StatusCode::BAD_REQUEST,
            Self::Classification(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(CoreError::Classification("empty".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::EmptyField { field: "instruction" }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::Generation("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
