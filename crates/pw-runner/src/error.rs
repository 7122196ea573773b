//! Error types for pw-runner

use pw_core::CoreError;
use pw_store::StoreError;
use pw_transform::TransformError;
use thiserror::Error;

/// Errors that abort a run before any mutation is attempted
#[derive(Error, Debug)]
pub enum RunError {
    /// Selecting the working set failed (R001)
    #[error("[R001] Failed to select documents for '{migration}': {source}")]
    QueryFailed {
        migration: String,
        #[source]
        source: StoreError,
    },

    /// No built-in migration by that name (R002)
    #[error("[R002] Unknown migration '{name}'. Run `pw list` to see available migrations")]
    UnknownMigration { name: String },
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;

/// Why a document could not be planned. Recorded as a per-document failure.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Transform tried to write a store-owned field (P001)
    #[error("[P001] {0}")]
    Protected(CoreError),

    /// Transform rejected the document's contents (P002)
    #[error("[P002] {0}")]
    Transform(TransformError),
}

impl From<TransformError> for PlanError {
    fn from(err: TransformError) -> Self {
        PlanError::Transform(err)
    }
}
