use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use trendscope_core::{apply_source_defaults, load_sources, AppConfig, RawProductRecord};
use trendscope_engine::{record_key, SignalRepository, TrendEngine};

/// Reads a feed file holding a JSON array of raw product records.
fn read_feed(path: &Path) -> anyhow::Result<Vec<RawProductRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read feed {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse feed {}", path.display()))
}

/// Reads the feed and fills missing country/style from the source catalog.
///
/// A missing catalog file is not an error; records are used as delivered.
fn load_feed(config: &AppConfig, path: &Path) -> anyhow::Result<Vec<RawProductRecord>> {
    let mut records = read_feed(path)?;

    if config.sources_path.exists() {
        let sources = load_sources(&config.sources_path)?;
        let filled = apply_source_defaults(&mut records, &sources);
        tracing::debug!(filled, "applied source defaults");
    } else {
        tracing::warn!(
            path = %config.sources_path.display(),
            "sources catalog not found; using records as delivered"
        );
    }

    tracing::info!(records = records.len(), feed = %path.display(), "loaded feed");
    Ok(records)
}

/// Ingest a feed through the engine and print the batch summary.
///
/// # Errors
///
/// Returns an error if the feed cannot be loaded or the batch is interrupted
/// by a repository failure. Records before the failure stay committed.
pub(crate) async fn run_trends_ingest<R: SignalRepository>(
    engine: &TrendEngine<R>,
    config: &AppConfig,
    file: &Path,
) -> anyhow::Result<()> {
    let records = load_feed(config, file)?;
    let summary = engine.ingest_batch(&records).await?;

    println!(
        "created {} / updated {} / newly confirmed {} / skipped {}",
        summary.created, summary.updated, summary.confirmed, summary.skipped
    );
    Ok(())
}

/// Validate and normalize a feed without touching the database.
///
/// Prints how many usable records and distinct brands fall under each
/// canonical key.
///
/// # Errors
///
/// Returns an error if the feed or the source catalog cannot be loaded.
pub(crate) fn run_trends_dry_run(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let records = load_feed(config, file)?;
    let (keys, skipped) = tally_keys(&records);

    println!("[dry-run] {} record(s), {skipped} skipped", records.len());
    let header = format!("{:<40}{:>9}{:>8}", "KEY", "RECORDS", "BRANDS");
    println!("{header}");
    for (key, (count, brands)) in &keys {
        println!("{key:<40}{count:>9}{:>8}", brands.len());
    }
    Ok(())
}

type KeyTally<'a> = BTreeMap<String, (usize, BTreeSet<&'a str>)>;

/// Per-key record counts and brand sets for usable records, plus the number
/// of rejected ones.
fn tally_keys(records: &[RawProductRecord]) -> (KeyTally<'_>, usize) {
    let mut keys: KeyTally<'_> = BTreeMap::new();
    let mut skipped = 0;

    for record in records {
        if record.rejection_reason().is_some() {
            skipped += 1;
            continue;
        }
        let entry = keys.entry(record_key(record)).or_default();
        entry.0 += 1;
        entry.1.insert(record.brand.trim());
    }

    (keys, skipped)
}
