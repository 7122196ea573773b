//! Error types for pw-core

use thiserror::Error;

/// Core error type for Patchwork
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Required configuration variable is absent
    #[error("[C001] Missing required configuration: {name}")]
    ConfigMissing { name: String },

    /// C002: Configuration value failed validation
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Configuration file not found
    #[error("[C003] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C004: Failed to parse configuration file
    #[error("[C004] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C005: Field path is empty or malformed
    #[error("[C005] Invalid field path '{path}': {reason}")]
    InvalidFieldPath { path: String, reason: String },

    /// C006: Attempt to write a system field such as `_id` or `_type`
    #[error("[C006] Field '{field}' is a system field and cannot be patched")]
    ProtectedField { field: String },

    /// C007: A raw record could not be decoded into a document
    #[error("[C007] Invalid document: {message}")]
    InvalidDocument { message: String },

    /// C008: A patch could not be applied to the document's current shape
    #[error("[C008] Cannot patch '{field}' on {document_id}: {reason}")]
    PatchConflict {
        document_id: String,
        field: String,
        reason: String,
    },

    /// C009: IO error with file path context
    #[error("[C009] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C010: IO error
    #[error("[C010] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C011: JSON error
    #[error("[C011] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
