//! Progress events streamed while a migration runs.

use pw_core::{DocumentId, RunReport};
use std::sync::Mutex;

/// One step of a run, in the order it happens.
///
/// `index` is the 1-based ordinal of the document in the selected snapshot.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Selected {
        migration: String,
        count: usize,
    },
    /// Document already reflects the transform
    Skipped {
        index: usize,
        total: usize,
        document_id: DocumentId,
        name: String,
    },
    /// A patch was planned; emitted in live and dry runs alike
    Planned {
        index: usize,
        total: usize,
        document_id: DocumentId,
        name: String,
        summary: String,
    },
    /// A per-item patch was committed
    Updated {
        index: usize,
        total: usize,
        document_id: DocumentId,
        name: String,
    },
    /// Planning or submitting this document failed
    Failed {
        index: usize,
        total: usize,
        document_id: DocumentId,
        name: String,
        error: String,
    },
    BatchCommitted {
        transaction_id: String,
        count: usize,
    },
    BatchFailed {
        transaction_id: String,
        count: usize,
        error: String,
    },
    Finished {
        report: RunReport,
    },
}

/// Receives progress events
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Discards every event
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &ProgressEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
