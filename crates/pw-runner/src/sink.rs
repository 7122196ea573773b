//! Patch sinks. Dry-run is a sink that accepts everything and writes nothing.

use async_trait::async_trait;
use pw_core::PatchOp;
use pw_store::{DocumentStore, StoreResult};

/// Where planned patches go
#[async_trait]
pub trait PatchSink: Send + Sync {
    /// Submit one document's patch on its own
    async fn submit(&self, op: &PatchOp) -> StoreResult<()>;

    /// Submit every patch as one all-or-nothing transaction
    async fn submit_batch(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()>;

    /// Whether submissions are persisted
    fn commits(&self) -> bool;
}

/// Forwards patches to a document store
pub struct CommitSink<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CommitSink<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PatchSink for CommitSink<'_> {
    async fn submit(&self, op: &PatchOp) -> StoreResult<()> {
        self.store.patch(op).await
    }

    async fn submit_batch(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()> {
        self.store.commit(transaction_id, ops).await
    }

    fn commits(&self) -> bool {
        true
    }
}

/// Accepts every patch and discards it
#[derive(Debug, Default)]
pub struct DryRunSink;

#[async_trait]
impl PatchSink for DryRunSink {
    async fn submit(&self, op: &PatchOp) -> StoreResult<()> {
        log::debug!("dry-run: skipping patch for {}", op.document_id);
        Ok(())
    }

    async fn submit_batch(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()> {
        log::debug!(
            "dry-run: skipping transaction {transaction_id} ({} patches)",
            ops.len()
        );
        Ok(())
    }

    fn commits(&self) -> bool {
        false
    }
}
