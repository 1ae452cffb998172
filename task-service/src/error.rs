//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{StorageError, StorageErrorKind};
use crate::validation::ValidationError;

/// Result type alias using our Error type
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected client input, detected before any storage call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task with this id
    #[error("task with id {0} not found")]
    NotFound(u64),

    /// Any storage failure not classified as not found
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Error::Validation(e) => {
                tracing::debug!(error = %e, "Rejected request");
                ErrorResponse::with_code(status, "VALIDATION_ERROR", e.to_string())
            }

            Error::NotFound(id) => ErrorResponse::with_code(
                status,
                "NOT_FOUND",
                format!("task with id {} not found", id),
            ),

            Error::Storage(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    task_id = ?e.task_id,
                    retriable = e.is_retriable(),
                    "Storage error: {}", e.message
                );

                let user_message = match e.kind {
                    StorageErrorKind::Timeout => "Storage operation timed out",
                    StorageErrorKind::ConnectionFailed => "Storage unavailable",
                    _ => "Storage operation failed",
                };
                let code = format!("STORAGE_{}", e.kind.to_string().to_uppercase());

                ErrorResponse::with_code(status, code, user_message)
            }

            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::with_code(status, "CONFIG_ERROR", "Service misconfigured")
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code(status, "IO_ERROR", "I/O operation failed")
            }
        };

        (status, Json(body)).into_response()
    }
}
