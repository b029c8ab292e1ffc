//! Trend command handlers for the CLI.
//!
//! `ingest --dry-run` works on the feed file alone; every other subcommand
//! runs against the Postgres-backed engine built in `main`.

mod ingest;
mod query;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use trendscope_core::{AppConfig, Segment, TrendFilters};
use trendscope_engine::{SignalRepository, TrendEngine};

pub(crate) use ingest::{run_trends_dry_run, run_trends_ingest};
pub(crate) use query::{run_trends_confirmed, run_trends_predict, run_trends_recommend};

/// Sub-commands available under `trends`.
#[derive(Debug, Subcommand)]
pub enum TrendsCommands {
    /// Ingest a JSON array of harvested product listings
    Ingest {
        /// Path to the feed file
        #[arg(long)]
        file: PathBuf,
        /// Validate and normalize the feed, print per-key counts, write nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// List confirmed trends
    Confirmed {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum number of trends to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Score every recently seen trend, best first
    Predict {
        /// Maximum number of predictions to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// List confirmed trends with a buy/avoid recommendation
    Recommend {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum number of trends to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

/// Filters shared by `confirmed` and `recommend`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FilterArgs {
    /// Country code (e.g., FR)
    #[arg(long)]
    pub country: Option<String>,
    /// Style (e.g., Streetwear)
    #[arg(long)]
    pub style: Option<String>,
    /// Product type (e.g., Hoodie)
    #[arg(long)]
    pub product_type: Option<String>,
    /// Majority segment of the trend: femme, homme, or enfant
    #[arg(long, value_parser = parse_segment)]
    pub segment: Option<Segment>,
}

impl From<FilterArgs> for TrendFilters {
    fn from(args: FilterArgs) -> Self {
        Self {
            country: args.country,
            style: args.style,
            product_type: args.product_type,
            segment: args.segment,
        }
    }
}

fn parse_segment(value: &str) -> Result<Segment, String> {
    Segment::parse(value)
        .ok_or_else(|| format!("unknown segment '{value}' (expected femme, homme, or enfant)"))
}

/// Runs a database-backed `trends` subcommand.
///
/// # Errors
///
/// Returns an error if the feed cannot be read or an engine call fails.
pub(crate) async fn dispatch<R: SignalRepository>(
    engine: &TrendEngine<R>,
    config: &AppConfig,
    command: TrendsCommands,
) -> anyhow::Result<()> {
    match command {
        TrendsCommands::Ingest { file, .. } => run_trends_ingest(engine, config, &file).await,
        TrendsCommands::Confirmed { filters, limit } => {
            run_trends_confirmed(engine, filters.into(), limit).await
        }
        TrendsCommands::Predict { limit } => run_trends_predict(engine, limit).await,
        TrendsCommands::Recommend { filters, limit } => {
            run_trends_recommend(engine, filters.into(), limit).await
        }
    }
}

/// Format an optional timestamp as a date, returning `"-"` when `None`.
fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn fmt_opt(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
