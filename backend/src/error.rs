//! Application error handling
//!
//! Converts engine and infrastructure errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitness_progress_shared::errors::AnalyticsError;
use fitness_progress_shared::types::{ErrorDetail, ErrorResponse};
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::NotFound(msg) => ApiError::NotFound(msg),
            AnalyticsError::StoreUnavailable(msg) => ApiError::Unavailable(msg),
            err @ AnalyticsError::InvalidRange { .. } => ApiError::InvalidRange(err.to_string()),
            AnalyticsError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, "INVALID_RANGE", msg.clone()),
            ApiError::Unavailable(msg) => {
                warn!("Session store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The session store is unavailable".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field: None,
            },
        });

        (status, body).into_response()
    }
}
