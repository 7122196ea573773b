//! Migration execution: select, plan, apply, report.

use crate::error::{RunError, RunResult};
use crate::migration::Migration;
use crate::plan::plan;
use crate::progress::{ProgressEvent, Reporter};
use crate::sink::{CommitSink, DryRunSink, PatchSink};
use pw_core::{ApplyPolicy, Document, PatchOp, Plan, Query, RunMode, RunReport};
use pw_store::DocumentStore;

/// Options for a single run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub mode: RunMode,
    pub include_drafts: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Live,
            include_drafts: false,
        }
    }
}

/// A planned patch together with the document it came from
struct Pending<'d> {
    index: usize,
    doc: &'d Document,
    op: PatchOp,
}

/// Runs migrations against one store
pub struct MigrationRunner<'a> {
    store: &'a dyn DocumentStore,
    reporter: &'a dyn Reporter,
}

impl<'a> MigrationRunner<'a> {
    /// Create a new migration runner
    pub fn new(store: &'a dyn DocumentStore, reporter: &'a dyn Reporter) -> Self {
        Self { store, reporter }
    }

    /// Fetch the working set. A failure here is fatal.
    pub async fn select(&self, migration: &str, query: &Query) -> RunResult<Vec<Document>> {
        self.store
            .fetch(query)
            .await
            .map_err(|source| RunError::QueryFailed {
                migration: migration.to_string(),
                source,
            })
    }

    /// Run a migration end to end.
    ///
    /// Only a select failure returns `Err`; every per-document or batch
    /// outcome is recorded in the returned report.
    pub async fn run(&self, migration: &Migration, options: RunOptions) -> RunResult<RunReport> {
        let mut report = RunReport::new(migration.name, options.mode, migration.policy);
        log::debug!(
            "Run {} of '{}' ({}, {}) on {} store",
            report.run_id,
            migration.name,
            options.mode,
            migration.policy,
            self.store.store_type()
        );

        let query = migration.query(options.include_drafts);
        let docs = self.select(migration.name, &query).await?;
        report.record_matched(docs.len());
        self.reporter.report(&ProgressEvent::Selected {
            migration: migration.name.to_string(),
            count: docs.len(),
        });

        let commit_sink;
        let dry_run_sink = DryRunSink;
        let sink: &dyn PatchSink = if options.mode.is_dry_run() {
            &dry_run_sink
        } else {
            commit_sink = CommitSink::new(self.store);
            &commit_sink
        };

        match migration.policy {
            ApplyPolicy::PerItem => {
                self.run_per_item(migration, &docs, sink, &mut report)
                    .await
            }
            ApplyPolicy::Batched => {
                let transaction_id = format!("{}-{}", migration.name, report.run_id);
                self.run_batched(migration, &transaction_id, &docs, sink, &mut report)
                    .await
            }
        }

        report.finish();
        debug_assert!(report.is_balanced());
        self.reporter.report(&ProgressEvent::Finished {
            report: report.clone(),
        });
        Ok(report)
    }

    /// Plan one document, recording skips.
    ///
    /// A plan failure is reported as a `Failed` event and handed back; the
    /// caller decides how it counts.
    fn plan_one<'d>(
        &self,
        migration: &Migration,
        index: usize,
        total: usize,
        doc: &'d Document,
        report: &mut RunReport,
    ) -> Result<Option<Pending<'d>>, String> {
        match plan(doc, migration.transform.as_ref()) {
            Ok(Plan::NoOp) => {
                report.record_skipped();
                self.reporter.report(&ProgressEvent::Skipped {
                    index,
                    total,
                    document_id: doc.id.clone(),
                    name: doc.display_name(),
                });
                Ok(None)
            }
            Ok(Plan::Patch(op)) => {
                self.reporter.report(&ProgressEvent::Planned {
                    index,
                    total,
                    document_id: doc.id.clone(),
                    name: doc.display_name(),
                    summary: op.summary(),
                });
                Ok(Some(Pending { index, doc, op }))
            }
            Err(e) => {
                let name = doc.display_name();
                log::warn!("Could not plan {} ({name}): {e}", doc.id);
                self.reporter.report(&ProgressEvent::Failed {
                    index,
                    total,
                    document_id: doc.id.clone(),
                    name,
                    error: e.to_string(),
                });
                Err(e.to_string())
            }
        }
    }

    /// Plan and submit each document in select order; a failure is recorded
    /// and the loop moves on.
    async fn run_per_item(
        &self,
        migration: &Migration,
        docs: &[Document],
        sink: &dyn PatchSink,
        report: &mut RunReport,
    ) {
        let total = docs.len();
        for (i, doc) in docs.iter().enumerate() {
            let pending = match self.plan_one(migration, i + 1, total, doc, report) {
                Ok(Some(pending)) => pending,
                Ok(None) => continue,
                Err(error) => {
                    report.record_failed(&doc.id, &doc.display_name(), &error);
                    continue;
                }
            };
            let name = pending.doc.display_name();

            match sink.submit(&pending.op).await {
                Ok(()) => {
                    if sink.commits() {
                        self.reporter.report(&ProgressEvent::Updated {
                            index: pending.index,
                            total,
                            document_id: pending.doc.id.clone(),
                            name,
                        });
                    }
                    report.record_updated(pending.op);
                }
                Err(e) => {
                    log::warn!("Patch failed for {} ({name}): {e}", pending.doc.id);
                    report.record_failed(&pending.doc.id, &name, &e.to_string());
                    self.reporter.report(&ProgressEvent::Failed {
                        index: pending.index,
                        total,
                        document_id: pending.doc.id.clone(),
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    /// Plan every document, then submit all patches as one transaction.
    ///
    /// If any document fails to plan, nothing is submitted and the whole
    /// batch is recorded as one failure.
    async fn run_batched(
        &self,
        migration: &Migration,
        transaction_id: &str,
        docs: &[Document],
        sink: &dyn PatchSink,
        report: &mut RunReport,
    ) {
        let total = docs.len();
        let mut ops = Vec::new();
        let mut plan_failures = Vec::new();
        for (i, doc) in docs.iter().enumerate() {
            match self.plan_one(migration, i + 1, total, doc, report) {
                Ok(Some(pending)) => ops.push(pending.op),
                Ok(None) => {}
                Err(error) => plan_failures.push(format!("{}: {error}", doc.id)),
            }
        }

        let count = ops.len() + plan_failures.len();
        if !plan_failures.is_empty() {
            let error = format!(
                "not submitted, {} of {count} documents could not be planned ({})",
                plan_failures.len(),
                plan_failures.join("; ")
            );
            log::warn!("Transaction {transaction_id} {error}");
            report.record_batch_failure(transaction_id, count, &error);
            self.reporter.report(&ProgressEvent::BatchFailed {
                transaction_id: transaction_id.to_string(),
                count,
                error,
            });
            return;
        }

        if ops.is_empty() {
            return;
        }

        match sink.submit_batch(transaction_id, &ops).await {
            Ok(()) => {
                if sink.commits() {
                    self.reporter.report(&ProgressEvent::BatchCommitted {
                        transaction_id: transaction_id.to_string(),
                        count,
                    });
                }
                for op in ops {
                    report.record_updated(op);
                }
            }
            Err(e) => {
                log::warn!("Transaction {transaction_id} rejected: {e}");
                report.record_batch_failure(transaction_id, count, &e.to_string());
                self.reporter.report(&ProgressEvent::BatchFailed {
                    transaction_id: transaction_id.to_string(),
                    count,
                    error: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
