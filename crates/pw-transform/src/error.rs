//! Error types for pw-transform

use pw_core::CoreError;
use thiserror::Error;

/// Transform errors. Each one is a per-document failure, never fatal.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Source field holds a value the transform cannot work with (T001)
    #[error("[T001] Cannot transform {document_id}: field '{field}' {reason}")]
    InvalidInput {
        document_id: String,
        field: String,
        reason: String,
    },

    /// Intermediate changes could not be applied while chaining (T002)
    #[error("[T002] Chained transform '{transform}' failed: {source}")]
    ChainStep {
        transform: String,
        #[source]
        source: CoreError,
    },

    /// Core error (T003)
    #[error("[T003] {0}")]
    Core(CoreError),
}

/// Result type alias for TransformError
pub type TransformResult<T> = Result<T, TransformError>;

impl From<CoreError> for TransformError {
    fn from(err: CoreError) -> Self {
        TransformError::Core(err)
    }
}
