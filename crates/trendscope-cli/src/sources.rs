use clap::Subcommand;
use trendscope_core::{load_sources, AppConfig};

/// Sub-commands available under `sources`.
#[derive(Debug, Subcommand)]
pub enum SourcesCommands {
    /// List configured harvest sources
    List,
}

/// Print every source in the catalog at `TRENDSCOPE_SOURCES_PATH`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub(crate) fn run_sources_list(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_sources(&config.sources_path)?;

    let header = format!("{:<20}{:<9}{:<14}LISTINGS", "BRAND", "COUNTRY", "STYLE");
    println!("{header}");
    for source in &catalog.sources {
        let listings = [
            source.new_in_url.as_ref().map(|_| "new_in"),
            source.best_sellers_url.as_ref().map(|_| "best_sellers"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
        println!(
            "{:<20}{:<9}{:<14}{}",
            source.brand,
            source.country.as_deref().unwrap_or("-"),
            source.style.as_deref().unwrap_or("-"),
            listings
        );
    }

    Ok(())
}
