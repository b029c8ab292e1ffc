mod sources;
mod trends;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trendscope_db::PgSignalRepository;
use trendscope_engine::TrendEngine;

use crate::sources::SourcesCommands;
use crate::trends::TrendsCommands;

#[derive(Debug, Parser)]
#[command(name = "trendscope-cli")]
#[command(about = "Trend detection and prediction over harvested product listings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Ingest listings and query confirmed, predicted, and recommended trends
    Trends {
        #[command(subcommand)]
        command: TrendsCommands,
    },
    /// Inspect the harvest-source catalog
    Sources {
        #[command(subcommand)]
        command: SourcesCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = trendscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; run with --help for usage");
        return Ok(());
    };

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    trendscope_db::health_check(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = trendscope_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Commands::Trends { command } => {
            if let TrendsCommands::Ingest {
                file,
                dry_run: true,
            } = &command
            {
                return trends::run_trends_dry_run(&config, file);
            }

            let pool = connect(&config).await?;
            trendscope_db::run_migrations(&pool).await?;
            let engine = TrendEngine::new(PgSignalRepository::new(pool), config.engine);
            trends::dispatch(&engine, &config, command).await?;
        }
        Commands::Sources { command } => match command {
            SourcesCommands::List => sources::run_sources_list(&config)?,
        },
    }

    Ok(())
}

async fn connect(config: &trendscope_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = trendscope_db::PoolConfig::from_app_config(config);
    let pool = trendscope_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
