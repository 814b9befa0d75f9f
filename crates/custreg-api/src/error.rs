//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps core validation errors and persistence failures to HTTP status codes
//! and JSON bodies carrying a machine-readable code and a message.
//! Internal error details are never exposed in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::DuplicateCpf;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "INVALID_CPF").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The supplied CPF failed sanitize-and-validate (422).
    ///
    /// Kept apart from [`AppError::Validation`] so clients can tell a bad
    /// identifier from a bad name or date, and from 404/409.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Request body or query string could not be parsed (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Uniqueness conflict, e.g. a CPF that is already registered (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::InvalidIdentifier(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CPF"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Construct a not-found error (404).
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert core validation errors to API errors.
impl From<custreg_core::ValidationError> for AppError {
    fn from(err: custreg_core::ValidationError) -> Self {
        match err {
            custreg_core::ValidationError::InvalidCpf(_) => Self::InvalidIdentifier(err.to_string()),
        }
    }
}

impl From<DuplicateCpf> for AppError {
    fn from(err: DuplicateCpf) -> Self {
        Self::Conflict(err.to_string())
    }
}

/// Unique-index violations become 409; everything else is a 500.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict("a customer with this CPF already exists".to_string())
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}
