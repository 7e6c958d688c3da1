//! # Response Formatting
//!
//! JSON bodies shared by every student endpoint. Errors use one envelope:
//! `{"status": "Error", "error": "..."}`, with a `fields` list added for
//! validation failures.

use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::model::{FieldViolation, StudentId, ValidationErrors};

const STATUS_ERROR: &str = "Error";

/// Serialize `payload` as JSON with the given status.
pub fn write_json<T: Serialize>(status: StatusCode, payload: T) -> Response {
    (status, Json(payload)).into_response()
}

/// Error envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl ErrorResponse {
    /// Wrap a plain error message
    pub fn general(err: impl Display) -> Self {
        Self {
            status: STATUS_ERROR,
            error: err.to_string(),
            fields: Vec::new(),
        }
    }

    /// List every field that failed validation
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            status: STATUS_ERROR,
            error: errors.to_string(),
            fields: errors.violations().to_vec(),
        }
    }
}

/// Body of `201 Created`
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub id: StudentId,
}

/// Confirmation body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
