//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Patchwork - repeatable content migrations for a headless CMS dataset
#[derive(Parser, Debug)]
#[command(name = "pw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: ./patchwork.yml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Use a local DuckDB store file instead of the remote dataset
    #[arg(short, long, global = true, env = "PW_LOCAL_STORE")]
    pub local: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a migration
    Run(RunArgs),

    /// List built-in migrations
    List(ListArgs),

    /// Load an NDJSON dataset export into the local store
    Import(ImportArgs),

    /// Write the local store out as NDJSON
    Export(ExportArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable progress lines
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Migration name (see `pw list`)
    pub migration: String,

    /// Plan and log every change without writing anything
    #[arg(long, env = "PW_DRY_RUN")]
    pub dry_run: bool,

    /// Also migrate draft copies (IDs starting with `drafts.`)
    #[arg(long)]
    pub include_drafts: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// NDJSON export file (one document per line)
    pub file: String,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(long)]
    pub out: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
