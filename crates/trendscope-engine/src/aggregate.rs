//! Batch ingestion, cross-brand confirmation, and confirmed-trend listings.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use trendscope_core::{
    EngineConfig, IngestSummary, NewTrendSignal, RawProductRecord, Segment, SignalIdentity,
    TrendFilters, TrendGroupSummary, TrendSignal,
};

use crate::error::TrendError;
use crate::group::group_by_key;
use crate::key::canonical_key;
use crate::normalize::resolve_attributes;
use crate::repository::{
    RepositoryError, SignalFilter, SignalOrder, SignalQuery, SignalRepository, SignalUpdate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpsertOutcome {
    Created,
    Updated,
}

/// Upserts every usable record, then re-runs confirmation for each canonical
/// key the batch touched.
///
/// Records are processed in order. Malformed records are skipped and counted.
///
/// # Errors
///
/// Returns [`TrendError::BatchInterrupted`] when a record's upsert fails;
/// records before it stay committed. Returns [`TrendError::Repository`] when
/// the confirmation pass fails.
pub async fn ingest_batch<R>(
    repo: &R,
    config: &EngineConfig,
    records: &[RawProductRecord],
    now: DateTime<Utc>,
) -> Result<IngestSummary, TrendError>
where
    R: SignalRepository + ?Sized,
{
    let mut summary = IngestSummary::default();
    let mut touched_keys: BTreeSet<String> = BTreeSet::new();

    for (processed, record) in records.iter().enumerate() {
        if let Some(reason) = record.rejection_reason() {
            tracing::warn!(
                brand = %record.brand,
                source = %record.source_reference,
                reason,
                "skipping malformed product record"
            );
            summary.skipped += 1;
            continue;
        }

        let (outcome, key) = match upsert_record(repo, record, now).await {
            Ok(done) => done,
            Err(source) => {
                tracing::warn!(
                    processed,
                    brand = %record.brand,
                    error = %source,
                    "ingest batch interrupted"
                );
                return Err(TrendError::BatchInterrupted { processed, source });
            }
        };

        match outcome {
            UpsertOutcome::Created => summary.created += 1,
            UpsertOutcome::Updated => summary.updated += 1,
        }
        touched_keys.insert(key);
    }

    for key in &touched_keys {
        summary.confirmed += confirm_key(repo, config, key, now).await?;
    }

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        confirmed = summary.confirmed,
        skipped = summary.skipped,
        keys = touched_keys.len(),
        "ingest batch complete"
    );

    Ok(summary)
}

async fn upsert_record<R>(
    repo: &R,
    record: &RawProductRecord,
    now: DateTime<Utc>,
) -> Result<(UpsertOutcome, String), RepositoryError>
where
    R: SignalRepository + ?Sized,
{
    let identity = SignalIdentity {
        product_name: record.name.trim().to_string(),
        brand: record.brand.trim().to_string(),
        source_reference: record.source_reference.trim().to_string(),
    };

    if let Some(existing) = repo.find_by_identity(&identity).await? {
        let key = record_sighting(repo, &existing, record, now).await?;
        return Ok((UpsertOutcome::Updated, key));
    }

    let resolved = resolve_attributes(record);
    let key = canonical_key(
        &resolved.product_type,
        resolved.cut.as_deref(),
        resolved.material.as_deref(),
    );

    let created = repo
        .create(NewTrendSignal {
            product_name: identity.product_name.clone(),
            product_type: resolved.product_type,
            cut: resolved.cut,
            material: resolved.material,
            color: resolved.color,
            brand: identity.brand.clone(),
            source_reference: identity.source_reference.clone(),
            source_section: record.section,
            price: record.stored_price(),
            currency: record.currency.clone(),
            image_reference: record.image_reference.clone(),
            country: record.country.clone().filter(|c| !c.trim().is_empty()),
            style: resolved.style,
            canonical_key: key.clone(),
            seen_at: now,
        })
        .await;

    match created {
        Ok(created) => {
            tracing::debug!(brand = %created.brand, key = %key, "created trend signal");
            Ok((UpsertOutcome::Created, key))
        }
        // A concurrent batch inserted the same identity between our lookup
        // and our insert; count this record as a sighting of that row.
        Err(RepositoryError::Conflict(conflict)) => {
            let existing = repo
                .find_by_identity(&identity)
                .await?
                .ok_or(RepositoryError::Conflict(conflict))?;
            tracing::debug!(brand = %identity.brand, "identity created concurrently");
            let key = record_sighting(repo, &existing, record, now).await?;
            Ok((UpsertOutcome::Updated, key))
        }
        Err(err) => Err(err),
    }
}

async fn record_sighting<R>(
    repo: &R,
    existing: &TrendSignal,
    record: &RawProductRecord,
    now: DateTime<Utc>,
) -> Result<String, RepositoryError>
where
    R: SignalRepository + ?Sized,
{
    repo.update(
        existing.id,
        SignalUpdate::Sighting {
            price: record.stored_price(),
            currency: record.currency.clone(),
            image_reference: record.image_reference.clone(),
            seen_at: now,
        },
    )
    .await?;
    tracing::debug!(
        brand = %existing.brand,
        key = %existing.canonical_key,
        appearances = existing.appearance_count + 1,
        "refreshed trend signal"
    );
    Ok(existing.canonical_key.clone())
}

/// Confirms every not-yet-confirmed signal of `key` once enough distinct
/// brands share it. Returns how many signals were newly confirmed.
///
/// The whole stored population of the key is re-read, not just the current
/// batch. Already-confirmed signals are never touched, so a pass that sees
/// fewer brands than an earlier one cannot downgrade anything.
///
/// # Errors
///
/// Returns [`RepositoryError`] if the scan or an update fails.
pub async fn confirm_key<R>(
    repo: &R,
    config: &EngineConfig,
    key: &str,
    now: DateTime<Utc>,
) -> Result<usize, RepositoryError>
where
    R: SignalRepository + ?Sized,
{
    let members = repo
        .query(&SignalQuery {
            filter: SignalFilter {
                canonical_key: Some(key.to_string()),
                ..SignalFilter::default()
            },
            order: SignalOrder::LastSeenDesc,
            limit: config.confirmation_scan_limit,
        })
        .await?;

    let brands: HashSet<&str> = members.iter().map(|m| m.brand.as_str()).collect();
    if brands.len() < config.confirmation_min_brands {
        tracing::debug!(key, brands = brands.len(), "key not confirmed yet");
        return Ok(0);
    }

    let score = i32::try_from(brands.len()).unwrap_or(i32::MAX);
    let mut confirmed = 0;
    for member in members.iter().filter(|m| !m.is_confirmed) {
        let changed = repo
            .update(
                member.id,
                SignalUpdate::Confirm {
                    score,
                    confirmed_at: now,
                },
            )
            .await?;
        if changed {
            confirmed += 1;
        }
    }

    if confirmed > 0 {
        tracing::info!(key, brands = brands.len(), confirmed, "trend confirmed");
    }
    Ok(confirmed)
}

/// Lists confirmed trends grouped by canonical key.
///
/// Reads up to `limit * listing_overfetch` confirmed signals (highest
/// confirmation score first), groups them, applies the segment filter to each
/// group's majority segment, then orders by segment preference, confirmation
/// flag, and confirmation score before truncating to `limit`.
///
/// # Errors
///
/// Returns [`TrendError::Repository`] if the read fails.
pub async fn list_confirmed_trends<R>(
    repo: &R,
    config: &EngineConfig,
    filters: &TrendFilters,
    limit: usize,
) -> Result<Vec<TrendGroupSummary>, TrendError>
where
    R: SignalRepository + ?Sized,
{
    if limit == 0 {
        return Ok(Vec::new());
    }

    let signals = repo
        .query(&SignalQuery {
            filter: SignalFilter {
                country: filters.country.clone(),
                style: filters.style.clone(),
                product_type: filters.product_type.clone(),
                canonical_key: None,
                is_confirmed: Some(true),
            },
            order: SignalOrder::ConfirmationScoreDesc,
            limit: limit.saturating_mul(config.listing_overfetch),
        })
        .await?;

    let mut groups: Vec<TrendGroupSummary> = group_by_key(signals)
        .iter()
        .map(crate::group::TrendGroup::summarize)
        .filter(|g| filters.segment.is_none() || g.segment == filters.segment)
        .collect();

    groups.sort_by(|a, b| {
        segment_rank(a.segment)
            .cmp(&segment_rank(b.segment))
            .then_with(|| b.is_confirmed.cmp(&a.is_confirmed))
            .then_with(|| b.confirmation_score.cmp(&a.confirmation_score))
    });
    groups.truncate(limit);

    Ok(groups)
}

/// Position in the femme, homme, enfant preference order; unknown sorts last.
fn segment_rank(segment: Option<Segment>) -> usize {
    segment
        .and_then(|s| Segment::PREFERENCE.iter().position(|p| *p == s))
        .unwrap_or(Segment::PREFERENCE.len())
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
