//! List command implementation

use anyhow::Result;
use pw_core::ApplyPolicy;
use pw_runner::{builtin_migrations, Migration};

use crate::cli::{ListArgs, OutputFormat};

/// Migration information for display
#[derive(Debug, serde::Serialize)]
struct MigrationInfo {
    name: &'static str,
    description: &'static str,
    policy: ApplyPolicy,
    transform: String,
    query: String,
}

impl From<&Migration> for MigrationInfo {
    fn from(migration: &Migration) -> Self {
        Self {
            name: migration.name,
            description: migration.description,
            policy: migration.policy,
            transform: migration.transform.name().to_string(),
            query: migration.query(false).to_groq(),
        }
    }
}

/// Execute the list command
pub async fn execute(args: &ListArgs) -> Result<()> {
    let migrations = builtin_migrations();
    let info: Vec<MigrationInfo> = migrations.iter().map(MigrationInfo::from).collect();

    match args.output {
        OutputFormat::Text => print_table(&info),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }

    Ok(())
}

fn print_table(migrations: &[MigrationInfo]) {
    let name_width = migrations
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let policy_width = 8;
    let transform_width = migrations
        .iter()
        .map(|m| m.transform.len())
        .max()
        .unwrap_or(9)
        .max(9);

    println!(
        "{:<name_width$}  {:<policy_width$}  {:<transform_width$}  DESCRIPTION",
        "NAME", "POLICY", "TRANSFORM"
    );
    println!(
        "{:-<name_width$}  {:-<policy_width$}  {:-<transform_width$}  {}",
        "",
        "",
        "",
        "-".repeat(40)
    );
    for migration in migrations {
        println!(
            "{:<name_width$}  {:<policy_width$}  {:<transform_width$}  {}",
            migration.name,
            migration.policy.to_string(),
            migration.transform,
            migration.description
        );
    }

    println!("\n{} migrations", migrations.len());
}
