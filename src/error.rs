//! Error types for `sheetsync`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for sheetsync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    // === Remote tracker errors ===
    /// Transport-level failure talking to the tracker.
    #[error("Tracker request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The tracker answered with a non-success HTTP status.
    #[error("Tracker returned status {status}: {detail}")]
    Api { status: u16, detail: String },

    // === Sheet errors ===
    /// A line of the sheet file could not be parsed.
    #[error("Sheet parse error at line {line}: {reason}")]
    SheetParse { line: usize, reason: String },

    /// Sheet file not found at the specified path.
    #[error("Sheet not found: {0}")]
    SheetNotFound(PathBuf),

    // === Validation errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Configuration errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials are missing or unusable.
    #[error("Authentication error: {0}")]
    Auth(String),

    // === I/O errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SyncError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build an API error from a response status and an optional body excerpt.
    #[must_use]
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }
}

/// Result type using `SyncError`.
pub type Result<T> = std::result::Result<T, SyncError>;
