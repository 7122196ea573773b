//! Import command implementation

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;

use crate::cli::{GlobalArgs, ImportArgs};
use crate::commands::common::open_local_store;

/// Execute the import command
pub async fn execute(args: &ImportArgs, global: &GlobalArgs) -> Result<()> {
    let (store, path) = open_local_store(global)?;
    let file = File::open(&args.file).with_context(|| format!("Failed to open {}", args.file))?;

    let count = store
        .import_ndjson(BufReader::new(file))
        .with_context(|| format!("Failed to import {}", args.file))?;

    println!("\u{2713} Imported {count} documents into {path}");
    Ok(())
}
