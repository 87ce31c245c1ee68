//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
///
/// Resource-absent and not-owned-by-caller are always merged into `NotFound`;
/// unknown-account and wrong-password are merged into `InvalidCredentials`.
/// Keeping each merge coarse is deliberate: no variant may act as an oracle
/// for whether a record exists for someone else.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("Invalid credentials. Please check your email and password.")]
    InvalidCredentials,

    #[error("Unauthenticated")]
    Unauthenticated,

    // Server errors (5xx)
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 404 Not Found
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),

            // 400 Bad Request
            AppError::BusinessRule(msg) => (
                StatusCode::BAD_REQUEST,
                "business_rule_violation",
                Some(msg.clone()),
            ),

            // 401 Unauthorized
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", None),

            // 500 Internal Server Error - log the cause, never leak it
            AppError::Signing(msg) => {
                tracing::error!("Token signing error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "signing_error", None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_message_is_generic() {
        // One message for both unknown-email and wrong-password.
        let err = AppError::InvalidCredentials;
        assert_eq!(
            err.to_string(),
            "Invalid credentials. Please check your email and password."
        );
    }

    #[test]
    fn not_found_carries_message() {
        let err = AppError::NotFound("Category not found or does not belong to user".to_string());
        assert!(err.to_string().contains("Category not found"));
    }
}
