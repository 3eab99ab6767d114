//! Error handling for the Shelfmark HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<String>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error with per-field messages
    pub fn validation(details: Vec<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();

        let (status, code, body) = match self {
            AppError::Validation { details, message } => {
                let body = if details.is_empty() {
                    message
                } else {
                    format!("{}: {}", message, details.join("; "))
                };
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", body)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message),
            AppError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message)
            }
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.to_string(),
            ),
        };

        tracing::error!(
            error_id = %error_id,
            error_code = code,
            status_code = status.as_u16(),
            timestamp = %OffsetDateTime::now_utc(),
            "request error"
        );

        // Hide internal error details outside debug builds.
        let body = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal server error occurred".to_string()
        } else {
            body
        };

        (status, body).into_response()
    }
}
