//! # HTTP API Errors
//!
//! Every handler failure becomes one of these and is rendered through the
//! error envelope; nothing escapes past the response boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use super::response::{write_json, ErrorResponse};
use crate::model::ValidationErrors;
use crate::storage::StorageError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Field-level constraint violations
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Empty or malformed body, unparseable path id
    #[error("{0}")]
    BadRequest(String),

    /// No student with the requested id
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Any other storage failure
    #[error("{0}")]
    Storage(StorageError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(errors) => ErrorResponse::validation(errors),
            ApiError::Storage(err) => {
                error!(code = err.code(), error = %err, "storage operation failed");
                ErrorResponse::general(err)
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "request rejected");
                ErrorResponse::general(other)
            }
        };
        write_json(status, body)
    }
}
