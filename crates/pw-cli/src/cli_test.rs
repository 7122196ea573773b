use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_args() {
    let cli = Cli::try_parse_from([
        "pw",
        "run",
        "equipment-icons",
        "--dry-run",
        "--local",
        "dataset.duckdb",
        "--report",
        "out/report.json",
    ])
    .unwrap();

    assert_eq!(cli.global.local.as_deref(), Some("dataset.duckdb"));
    let Commands::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.migration, "equipment-icons");
    assert!(args.dry_run);
    assert!(!args.include_drafts);
    assert_eq!(args.report.as_deref(), Some("out/report.json"));
    assert_eq!(args.output, OutputFormat::Text);
}

#[test]
fn test_run_requires_migration() {
    assert!(Cli::try_parse_from(["pw", "run"]).is_err());
}

#[test]
fn test_list_json() {
    let cli = Cli::try_parse_from(["pw", "list", "-o", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::List(ListArgs {
            output: OutputFormat::Json
        })
    ));
}
