//! Run report: per-run outcome accounting for one migration.
//!
//! Every matched document ends up counted exactly once as updated, skipped,
//! or failed. In dry-run mode "updated" means "would be updated".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::ids::DocumentId;
use crate::patch::PatchOp;

/// Whether a run commits to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Live,
    DryRun,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        }
    }

    pub fn is_dry_run(self) -> bool {
        self == RunMode::DryRun
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Live => write!(f, "live"),
            RunMode::DryRun => write!(f, "dry-run"),
        }
    }
}

/// How planned patches are submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPolicy {
    /// One transaction, all or nothing
    Batched,
    /// One submission per document, failures isolated
    PerItem,
}

impl fmt::Display for ApplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyPolicy::Batched => write!(f, "batched"),
            ApplyPolicy::PerItem => write!(f, "per-item"),
        }
    }
}

/// What a failure covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureScope {
    Document {
        document_id: DocumentId,
        name: String,
    },
    /// A rejected transaction; none of its documents were changed
    Batch {
        transaction_id: String,
        documents: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub scope: FailureScope,

    pub error: String,

    pub failed_at: DateTime<Utc>,
}

/// Outcome of one migration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Short identifier for this run
    pub run_id: String,

    pub migration: String,

    pub mode: RunMode,

    pub policy: ApplyPolicy,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    pub matched: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,

    pub failures: Vec<Failure>,

    /// Committed changes in a live run, intended changes in a dry run
    pub changes: Vec<PatchOp>,
}

impl RunReport {
    pub fn new(migration: &str, mode: RunMode, policy: ApplyPolicy) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            migration: migration.to_string(),
            mode,
            policy,
            started_at: Utc::now(),
            finished_at: None,
            matched: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            failures: Vec::new(),
            changes: Vec::new(),
        }
    }

    pub fn record_matched(&mut self, count: usize) {
        self.matched = count;
    }

    /// Document already reflects the transform
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_updated(&mut self, op: PatchOp) {
        self.updated += 1;
        self.changes.push(op);
    }

    pub fn record_failed(&mut self, document_id: &DocumentId, name: &str, error: &str) {
        self.failed += 1;
        self.failures.push(Failure {
            scope: FailureScope::Document {
                document_id: document_id.clone(),
                name: name.to_string(),
            },
            error: error.to_string(),
            failed_at: Utc::now(),
        });
    }

    /// A rejected transaction counts every document in it as failed but is
    /// reported as a single failure.
    pub fn record_batch_failure(&mut self, transaction_id: &str, documents: usize, error: &str) {
        self.failed += documents;
        self.failures.push(Failure {
            scope: FailureScope::Batch {
                transaction_id: transaction_id.to_string(),
                documents,
            },
            error: error.to_string(),
            failed_at: Utc::now(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every matched document has exactly one outcome.
    pub fn is_balanced(&self) -> bool {
        self.updated + self.skipped + self.failed == self.matched
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// Save the report as JSON atomically (write to temp, then rename)
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.mode.is_dry_run() {
            "would update"
        } else {
            "updated"
        };
        write!(
            f,
            "{} matched, {} {verb}, {} skipped, {} failed",
            self.matched, self.updated, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_path::FieldPath;
    use serde_json::json;
    use tempfile::tempdir;

    fn id(s: &str) -> DocumentId {
        DocumentId::try_new(s).unwrap()
    }

    fn op(doc: &str) -> PatchOp {
        PatchOp::new(id(doc)).set(FieldPath::parse("icon").unwrap(), json!("Wifi"))
    }

    #[test]
    fn test_new_report() {
        let report = RunReport::new("equipment-icons", RunMode::Live, ApplyPolicy::PerItem);
        assert_eq!(report.run_id.len(), 8);
        assert_eq!(report.matched, 0);
        assert!(report.is_success());
        assert!(report.is_balanced());
        assert!(report.duration_ms().is_none());
    }

    #[test]
    fn test_per_item_accounting() {
        let mut report = RunReport::new("equipment-icons", RunMode::Live, ApplyPolicy::PerItem);
        report.record_matched(3);
        report.record_updated(op("e1"));
        report.record_skipped();
        report.record_failed(&id("e3"), "Piscine", "[S003] Patch rejected");
        report.finish();

        assert!(report.is_balanced());
        assert!(!report.is_success());
        assert_eq!(report.changes.len(), 1);
        assert!(report.duration_ms().is_some());
        assert_eq!(
            report.to_string(),
            "3 matched, 1 updated, 1 skipped, 1 failed"
        );
    }

    #[test]
    fn test_batch_failure_is_one_entry() {
        let mut report =
            RunReport::new("villa-geo-private-info", RunMode::Live, ApplyPolicy::Batched);
        report.record_matched(4);
        report.record_batch_failure("tx-1", 4, "[S004] Transaction rejected");

        assert_eq!(report.failed, 4);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].scope,
            FailureScope::Batch { documents: 4, .. }
        ));
        assert!(report.is_balanced());
    }

    #[test]
    fn test_dry_run_wording() {
        let mut report = RunReport::new("x", RunMode::from_dry_run(true), ApplyPolicy::PerItem);
        report.record_matched(1);
        report.record_updated(op("e1"));
        assert_eq!(report.to_string(), "1 matched, 1 would update, 0 skipped, 0 failed");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        let mut report = RunReport::new("equipment-icons", RunMode::DryRun, ApplyPolicy::PerItem);
        report.record_matched(2);
        report.record_updated(op("e1"));
        report.record_failed(&id("e2"), "Wifi", "boom");
        report.finish();
        report.save(&path).unwrap();

        let loaded = RunReport::load(&path).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.mode, RunMode::DryRun);
        assert_eq!(loaded.changes, report.changes);
        assert_eq!(loaded.failures[0].scope, report.failures[0].scope);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["failures"][0]["scope"]["kind"], "document");
        assert_eq!(raw["policy"], "per_item");
    }
}
