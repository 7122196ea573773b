//! pw-runner - Migration runner for Patchwork
//!
//! Selects a migration's working set from a [`pw_store::DocumentStore`],
//! plans a minimal patch per document, applies the patches batched or per
//! item (or to a dry-run sink), and accounts for every document in a
//! [`pw_core::RunReport`].

pub mod error;
pub mod migration;
pub mod plan;
pub mod progress;
pub mod runner;
pub mod sink;

pub use error::{PlanError, RunError, RunResult};
pub use migration::{builtin_migrations, find_migration, Migration};
pub use plan::plan;
pub use progress::{MemoryReporter, NullReporter, ProgressEvent, Reporter};
pub use runner::{MigrationRunner, RunOptions};
pub use sink::{CommitSink, DryRunSink, PatchSink};
