use std::path::PathBuf;

use trendscope_core::{Segment, TrendFilters};

use super::*;
use crate::trends::FilterArgs;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["trendscope-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["trendscope-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["trendscope-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn ingest_requires_file() {
    assert!(Cli::try_parse_from(["trendscope-cli", "trends", "ingest"]).is_err());
}

#[test]
fn parses_ingest_dry_run() {
    let cli = Cli::try_parse_from([
        "trendscope-cli",
        "trends",
        "ingest",
        "--file",
        "feed.json",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Trends {
            command: TrendsCommands::Ingest { file, dry_run },
        }) => {
            assert_eq!(file, PathBuf::from("feed.json"));
            assert!(dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn confirmed_defaults_to_no_filters_and_limit_20() {
    let cli = Cli::try_parse_from(["trendscope-cli", "trends", "confirmed"]).unwrap();

    match cli.command {
        Some(Commands::Trends {
            command: TrendsCommands::Confirmed { filters, limit },
        }) => {
            assert_eq!(filters, FilterArgs::default());
            assert_eq!(limit, 20);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_confirmed_filters() {
    let cli = Cli::try_parse_from([
        "trendscope-cli",
        "trends",
        "confirmed",
        "--country",
        "FR",
        "--style",
        "Streetwear",
        "--product-type",
        "Hoodie",
        "--segment",
        "Femme",
        "--limit",
        "5",
    ])
    .unwrap();

    let Some(Commands::Trends {
        command: TrendsCommands::Confirmed { filters, limit },
    }) = cli.command
    else {
        panic!("expected trends confirmed");
    };
    assert_eq!(limit, 5);
    assert_eq!(
        TrendFilters::from(filters),
        TrendFilters {
            country: Some("FR".to_string()),
            style: Some("Streetwear".to_string()),
            product_type: Some("Hoodie".to_string()),
            segment: Some(Segment::Femme),
        }
    );
}

#[test]
fn rejects_unknown_segment() {
    let result = Cli::try_parse_from([
        "trendscope-cli",
        "trends",
        "recommend",
        "--segment",
        "unisex",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_predict_limit() {
    let cli =
        Cli::try_parse_from(["trendscope-cli", "trends", "predict", "--limit", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trends {
            command: TrendsCommands::Predict { limit: 3 }
        })
    ));
}

#[test]
fn parses_sources_list() {
    let cli = Cli::try_parse_from(["trendscope-cli", "sources", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sources {
            command: SourcesCommands::List
        })
    ));
}
