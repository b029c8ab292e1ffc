use trendscope_core::{Segment, TrendFilters, TrendGroupSummary, TrendPhase};
use trendscope_engine::{SignalRepository, TrendEngine};

use super::{fmt_date, fmt_opt};

fn segment_label(group: &TrendGroupSummary) -> &'static str {
    group.segment.map_or("-", Segment::as_str)
}

/// Show confirmed trends, one line per canonical key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_trends_confirmed<R: SignalRepository>(
    engine: &TrendEngine<R>,
    filters: TrendFilters,
    limit: usize,
) -> anyhow::Result<()> {
    let groups = engine.list_confirmed_trends(&filters, limit).await?;

    if groups.is_empty() {
        println!("no trend confirmed yet; ingest more listings with `trends ingest`");
        return Ok(());
    }

    let header = format!(
        "{:<36}{:>7}{:>11}{:>7}  {:<8}{:<10}BRANDS",
        "KEY", "SCORE", "AVG PRICE", "SEEN", "SEGMENT", "COUNTRY"
    );
    println!("{header}");
    for group in &groups {
        println!(
            "{:<36}{:>7}{:>11.2}{:>7}  {:<8}{:<10}{}",
            group.canonical_key,
            group.confirmation_score,
            group.average_price,
            group.appearance_count,
            segment_label(group),
            fmt_opt(group.dominant_country.as_deref()),
            group.brands.join(", ")
        );
    }

    Ok(())
}

/// Show trend predictions, best first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_trends_predict<R: SignalRepository>(
    engine: &TrendEngine<R>,
    limit: usize,
) -> anyhow::Result<()> {
    let predictions = engine.predict_trends(limit).await?;

    if predictions.is_empty() {
        println!("no trend detected yet; ingest listings with `trends ingest`");
        return Ok(());
    }

    let header = format!(
        "{:<36}{:>6}{:>5}{:>5}{:>5}{:>5}  {:<10}{:<11}PEAK",
        "KEY", "SCORE", "VEL", "DIV", "EMG", "PRC", "PHASE", "CONFIDENCE"
    );
    println!("{header}");
    for p in &predictions {
        println!(
            "{:<36}{:>6}{:>5}{:>5}{:>5}{:>5}  {:<10}{:<11}{}",
            p.canonical_key,
            p.prediction_score,
            p.velocity_score,
            p.diversity_score,
            p.emergence_score,
            p.price_stability_score,
            p.phase.as_str(),
            p.confidence.to_string(),
            fmt_date(p.predicted_peak_date)
        );
    }

    Ok(())
}

/// Show confirmed trends with their buy/avoid recommendation.
///
/// # Errors
///
/// Returns an error if either database query fails.
pub(crate) async fn run_trends_recommend<R: SignalRepository>(
    engine: &TrendEngine<R>,
    filters: TrendFilters,
    limit: usize,
) -> anyhow::Result<()> {
    let entries = engine.list_trends_with_recommendation(&filters, limit).await?;

    if entries.is_empty() {
        println!("no trend confirmed yet; nothing to recommend");
        return Ok(());
    }

    let header = format!(
        "{:<13}{:<36}{:>7}  {:<10}SEGMENT",
        "VERDICT", "KEY", "SCORE", "PHASE"
    );
    println!("{header}");
    for entry in &entries {
        println!(
            "{:<13}{:<36}{:>7}  {:<10}{}",
            entry.recommendation.to_string(),
            entry.group.canonical_key,
            entry.group.confirmation_score,
            entry.phase.map_or("-", TrendPhase::as_str),
            segment_label(&entry.group)
        );
    }

    Ok(())
}
