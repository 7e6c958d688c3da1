//! Storage error types
//!
//! Error codes:
//! - STUDENTS_STORAGE_NOT_FOUND
//! - STUDENTS_STORAGE_QUERY_FAILED
//! - STUDENTS_STORAGE_WRITE_FAILED
//! - STUDENTS_STORAGE_UNAVAILABLE

use thiserror::Error;

use crate::model::StudentId;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No row matches the id
    #[error("no student found with id {0}")]
    NotFound(StudentId),

    /// Read failed inside the engine
    #[error("query error: {0}")]
    Query(String),

    /// Insert, update or delete failed inside the engine
    #[error("write error: {0}")]
    Write(String),

    /// The connection could not be opened or used at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "STUDENTS_STORAGE_NOT_FOUND",
            StorageError::Query(_) => "STUDENTS_STORAGE_QUERY_FAILED",
            StorageError::Write(_) => "STUDENTS_STORAGE_WRITE_FAILED",
            StorageError::Unavailable(_) => "STUDENTS_STORAGE_UNAVAILABLE",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    pub(crate) fn query(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }

    pub(crate) fn write(err: rusqlite::Error) -> Self {
        StorageError::Write(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StorageError::NotFound(1).code(), "STUDENTS_STORAGE_NOT_FOUND");
        assert_eq!(
            StorageError::Query("x".into()).code(),
            "STUDENTS_STORAGE_QUERY_FAILED"
        );
        assert_eq!(
            StorageError::Write("x".into()).code(),
            "STUDENTS_STORAGE_WRITE_FAILED"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = StorageError::NotFound(7);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no student found with id 7");
    }
}
