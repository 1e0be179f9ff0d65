//! Error types for svctrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation, unknown id, bad args or config)
//! - 4: Operation failed (storage backend read/write fault)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the svctrack CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for svctrack operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Backend failures (exit code 4)
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    pub fn task_not_found(id: u64) -> Self {
        Error::NotFound { kind: "task", id }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::NotFound { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::Backend(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::Http(_)
            | Error::Csv(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// True for storage faults (as opposed to deterministic user errors).
    pub fn is_backend(&self) -> bool {
        self.exit_code() == exit_codes::OPERATION_FAILED
    }

    /// Structured fields for the JSON error envelope.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotFound { kind, id } => Some(serde_json::json!({
                "kind": kind,
                "id": id,
            })),
            Error::Validation(message)
            | Error::InvalidArgument(message)
            | Error::InvalidConfig(message) => Some(serde_json::json!({
                "message": message,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({
                "path": path.display().to_string(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for svctrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
