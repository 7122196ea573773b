//! Run command implementation

use anyhow::{Context, Result};
use pw_core::RunMode;
use pw_runner::{find_migration, MigrationRunner, RunOptions};
use std::path::Path;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{open_store, ExitCode};
use crate::commands::console::ConsoleReporter;

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let migration = find_migration(&args.migration)?;
    let mode = RunMode::from_dry_run(args.dry_run);
    let json = args.output == OutputFormat::Json;

    let store = open_store(global, mode)?;
    let reporter = ConsoleReporter::new(json);
    let runner = MigrationRunner::new(store.as_ref(), &reporter);

    let options = RunOptions {
        mode,
        include_drafts: args.include_drafts,
    };
    let report = runner
        .run(&migration, options)
        .await
        .with_context(|| format!("Migration {} aborted", migration.name))?;

    if let Some(path) = &args.report {
        report
            .save(Path::new(path))
            .with_context(|| format!("Failed to write report to {path}"))?;
        if !json {
            println!("Report written to {path}");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !report.is_success() {
        return Err(ExitCode(4).into());
    }

    Ok(())
}
