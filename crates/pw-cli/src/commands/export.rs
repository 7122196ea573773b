//! Export command implementation

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common::open_local_store;

/// Execute the export command
pub async fn execute(args: &ExportArgs, global: &GlobalArgs) -> Result<()> {
    let (store, path) = open_local_store(global)?;

    match &args.out {
        Some(out) => {
            let file = File::create(out).with_context(|| format!("Failed to create {out}"))?;
            let mut writer = BufWriter::new(file);
            let count = store
                .export_ndjson(&mut writer)
                .with_context(|| format!("Failed to export {path}"))?;
            writer.flush()?;
            println!("\u{2713} Exported {count} documents to {out}");
        }
        None => {
            // stdout carries the data, so the count goes to stderr
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let count = store
                .export_ndjson(&mut writer)
                .with_context(|| format!("Failed to export {path}"))?;
            writer.flush()?;
            eprintln!("\u{2713} Exported {count} documents");
        }
    }

    Ok(())
}
