//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use pw_core::{ConfigFile, RunMode, StoreConfig};
use pw_store::{DocumentStore, HttpStore, LocalStore};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is control flow, not a user-facing
        // error, and must never add text to stderr.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load `--config`, or `patchwork.yml` from the working directory if present.
pub(crate) fn load_config_file(global: &GlobalArgs) -> Result<Option<ConfigFile>> {
    match &global.config {
        Some(path) => {
            let file = ConfigFile::load(Path::new(path))
                .with_context(|| format!("Failed to load config {path}"))?;
            Ok(Some(file))
        }
        None => ConfigFile::load_from_dir(Path::new(".")).context("Failed to load patchwork.yml"),
    }
}

/// The local store file, from `--local` or the config file.
pub(crate) fn local_store_path(global: &GlobalArgs, file: Option<&ConfigFile>) -> Option<String> {
    global
        .local
        .clone()
        .or_else(|| file.and_then(|f| f.local_store.clone()))
}

/// Open the local store; commands that only make sense locally use this.
pub(crate) fn open_local_store(global: &GlobalArgs) -> Result<(LocalStore, String)> {
    let file = load_config_file(global)?;
    let path = local_store_path(global, file.as_ref()).context(
        "No local store configured. Pass --local <file.duckdb> or set local_store in patchwork.yml",
    )?;
    let store =
        LocalStore::new(&path).with_context(|| format!("Failed to open local store {path}"))?;
    Ok((store, path))
}

/// Open the store a run should work against.
///
/// A local store wins when configured. Otherwise the remote configuration is
/// resolved and validated here, before any request is made; live runs also
/// need a token.
pub(crate) fn open_store(global: &GlobalArgs, mode: RunMode) -> Result<Box<dyn DocumentStore>> {
    let file = load_config_file(global)?;

    if let Some(path) = local_store_path(global, file.as_ref()) {
        log::debug!("Using local store {path}");
        let store =
            LocalStore::new(&path).with_context(|| format!("Failed to open local store {path}"))?;
        return Ok(Box::new(store));
    }

    let config = StoreConfig::from_env(file.as_ref()).context("Invalid store configuration")?;
    if !mode.is_dry_run() {
        config
            .require_token()
            .context("A token is required for live runs (use --dry-run to rehearse)")?;
    }
    log::debug!("Using remote store {config:?}");
    let store = HttpStore::new(config).context("Failed to create HTTP client")?;
    Ok(Box::new(store))
}
