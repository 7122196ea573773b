//! Error types for pw-store

use thiserror::Error;

/// Document store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error (S001)
    #[error("[S001] Store connection failed: {0}")]
    ConnectionError(String),

    /// Query rejected or store unreachable during select (S002)
    #[error("[S002] Query failed: {0}")]
    QueryError(String),

    /// A single document patch was rejected (S003)
    #[error("[S003] Patch rejected for {document_id}: {message}")]
    PatchRejected {
        document_id: String,
        message: String,
    },

    /// A multi-document transaction was rejected as a whole (S004)
    #[error("[S004] Transaction {transaction_id} rejected: {message}")]
    TransactionRejected {
        transaction_id: String,
        message: String,
    },

    /// Document changed since it was selected (S005)
    #[error("[S005] Revision conflict on {document_id}: expected {expected}, found {found}")]
    RevisionConflict {
        document_id: String,
        expected: String,
        found: String,
    },

    /// Patch target does not exist (S006)
    #[error("[S006] Document not found: {0}")]
    DocumentNotFound(String),

    /// Response or stored record could not be decoded (S007)
    #[error("[S007] Failed to decode store data: {0}")]
    DecodeError(String),

    /// Mutex poisoned (S008)
    #[error("[S008] Store mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (S009)
    #[error("[S009] Internal store error: {0}")]
    Internal(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::Internal(err.to_string())
    }
}

impl From<pw_core::CoreError> for StoreError {
    fn from(err: pw_core::CoreError) -> Self {
        StoreError::DecodeError(err.to_string())
    }
}
