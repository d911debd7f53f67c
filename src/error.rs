//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Invalid parameters")]
    InvalidParameters(String),

    #[error("Missing date parameters")]
    MissingDateParameters,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Category already exists: {0}")]
    CategoryExists(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn classify(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::InvalidBody(reason) | AppError::InvalidParameters(reason) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(reason.clone()))
            }
            AppError::MissingDateParameters => {
                (StatusCode::BAD_REQUEST, "invalid_request", None)
            }

            // 401 Unauthorized
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized", None),

            // 409 Conflict
            AppError::CategoryExists(id) => {
                (StatusCode::CONFLICT, "category_exists", Some(id.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::CategoryNotFound(id) => {
                    (StatusCode::NOT_FOUND, "category_not_found", Some(id.clone()))
                }
                DomainError::TransactionNotFound(id) => {
                    (StatusCode::NOT_FOUND, "transaction_not_found", Some(id.clone()))
                }
                DomainError::NotOwner => (StatusCode::FORBIDDEN, "forbidden", None),
                DomainError::InvalidAmount(_)
                | DomainError::InvalidDate(_)
                | DomainError::InvalidDateRange { .. }
                | DomainError::InvalidTransactionType(_)
                | DomainError::InvalidCategoryId(_)
                | DomainError::UnsupportedCurrency(_)
                | DomainError::InvalidPeriod(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_request", None)
                }
            },

            // 500 Internal Server Error
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        }
    }
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
        let (status, error_code, details) = self.classify();

        // Server-side failures are logged here and never echoed to the client
        let error = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal Server Error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
