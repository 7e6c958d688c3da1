//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed and the process exits non-zero.

use std::fmt;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration missing or invalid
    ConfigError,
    /// Storage could not be opened
    StorageError,
    /// Runtime, logging or listener setup failed
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "STUDENTS_CLI_CONFIG_ERROR",
            Self::StorageError => "STUDENTS_CLI_STORAGE_ERROR",
            Self::BootFailed => "STUDENTS_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Storage error
    pub fn storage_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StorageError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<crate::storage::StorageError> for CliError {
    fn from(e: crate::storage::StorageError) -> Self {
        Self::storage_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
