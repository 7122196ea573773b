//! Console rendering of run progress

use pw_core::FailureScope;
use pw_runner::{ProgressEvent, Reporter};

/// Prints progress lines to stdout
pub(crate) struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }
        println!("{}", render(event));
    }
}

/// One console line (or block) per event
pub(crate) fn render(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Selected { migration, count } => {
            format!("Running {migration}: {count} documents matched\n")
        }
        ProgressEvent::Skipped {
            index, total, name, ..
        } => format!("  - [{index}/{total}] {name} (already migrated)"),
        ProgressEvent::Planned {
            index,
            total,
            name,
            summary,
            ..
        } => format!("  [{index}/{total}] {name}: {summary}"),
        ProgressEvent::Updated {
            index, total, name, ..
        } => format!("  \u{2713} [{index}/{total}] {name}"),
        ProgressEvent::Failed {
            index,
            total,
            name,
            error,
            ..
        } => format!("  \u{2717} [{index}/{total}] {name} - {error}"),
        ProgressEvent::BatchCommitted {
            transaction_id,
            count,
        } => format!("  \u{2713} Committed transaction {transaction_id} ({count} documents)"),
        ProgressEvent::BatchFailed {
            transaction_id,
            count,
            error,
        } => format!(
            "  \u{2717} Transaction {transaction_id} rejected, {count} documents unchanged - {error}"
        ),
        ProgressEvent::Finished { report } => {
            let mut out = String::new();
            let label = if report.mode.is_dry_run() {
                "Dry run complete"
            } else {
                "Done"
            };
            out.push_str(&format!("\n{label}: {report}"));
            if let Some(ms) = report.duration_ms() {
                out.push_str(&format!(" [{ms}ms]"));
            }
            if !report.failures.is_empty() {
                out.push_str("\n\nFailures:");
                for failure in &report.failures {
                    let subject = match &failure.scope {
                        FailureScope::Document { document_id, name } => {
                            format!("{name} ({document_id})")
                        }
                        FailureScope::Batch {
                            transaction_id,
                            documents,
                        } => format!("transaction {transaction_id} ({documents} documents)"),
                    };
                    out.push_str(&format!("\n  \u{2717} {subject}: {}", failure.error));
                }
            }
            out
        }
    }
}

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;
