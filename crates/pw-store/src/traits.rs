//! Document store trait definition

use crate::error::StoreResult;
use async_trait::async_trait;
use pw_core::{Document, PatchOp, Query};

/// Document store abstraction for Patchwork
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return a complete snapshot of documents matching the query, ordered by
    /// document ID
    async fn fetch(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Apply one document's patch on its own
    async fn patch(&self, op: &PatchOp) -> StoreResult<()>;

    /// Apply every patch in one transaction: all succeed or none are applied
    async fn commit(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()>;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;
}
