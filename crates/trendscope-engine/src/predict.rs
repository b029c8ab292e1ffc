//! Forward-looking scoring of canonical groups.
//!
//! Each group gets four 0-100 sub-scores that are combined into one
//! prediction score, plus a lifecycle phase, a confidence label, and an
//! estimated peak date.

use chrono::{DateTime, Duration, Utc};
use trendscope_core::{ConfidenceLevel, TrendPhase, TrendPrediction};

use crate::group::TrendGroup;
use crate::stats::{clamp_score, coefficient_of_variation};

const VELOCITY_WEIGHT: f64 = 0.30;
const DIVERSITY_WEIGHT: f64 = 0.25;
const EMERGENCE_WEIGHT: f64 = 0.25;
const PRICE_STABILITY_WEIGHT: f64 = 0.20;

/// Brand count at which the brand half of diversity saturates.
const DIVERSITY_BRAND_CAP: f64 = 5.0;
/// Country count at which the country half of diversity saturates.
const DIVERSITY_COUNTRY_CAP: f64 = 10.0;

/// Price stability when a group has no usable price observation.
const NEUTRAL_PRICE_STABILITY: u8 = 50;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Sightings times brands per day of observed span, halved and scaled to 100.
///
/// The span is measured in fractional days and floored at one day, so a
/// burst observed within a single day is not inflated.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn velocity_score(
    appearance_count: i64,
    brand_count: usize,
    first_seen_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
) -> u8 {
    let span_days =
        ((last_seen_at - first_seen_at).num_seconds() as f64 / SECONDS_PER_DAY).max(1.0);
    let rate = (appearance_count as f64 * brand_count as f64) / span_days;
    clamp_score(rate / 2.0 * 100.0)
}

/// Brand spread weighted 0.6, geographic spread weighted 0.4.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn diversity_score(brand_count: usize, country_count: usize) -> u8 {
    let brands = f64::from(clamp_score(
        brand_count as f64 / DIVERSITY_BRAND_CAP * 100.0,
    ));
    let countries = f64::from(clamp_score(
        country_count as f64 / DIVERSITY_COUNTRY_CAP * 100.0,
    ));
    clamp_score(0.6 * brands + 0.4 * countries)
}

/// Share of sightings that came from new-arrival listings.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn emergence_score(new_in_count: usize, total_sightings: usize) -> u8 {
    if total_sightings == 0 {
        return 0;
    }
    clamp_score(new_in_count as f64 / total_sightings as f64 * 100.0)
}

/// `100 - 200 * cv` over the observed prices; neutral when nothing usable
/// was observed.
#[must_use]
pub fn price_stability_score(prices: &[f64]) -> u8 {
    match coefficient_of_variation(prices) {
        Some(cv) => clamp_score(100.0 - 200.0 * cv),
        None => NEUTRAL_PRICE_STABILITY,
    }
}

#[must_use]
pub fn combined_score(velocity: u8, diversity: u8, emergence: u8, price_stability: u8) -> u8 {
    clamp_score(
        VELOCITY_WEIGHT * f64::from(velocity)
            + DIVERSITY_WEIGHT * f64::from(diversity)
            + EMERGENCE_WEIGHT * f64::from(emergence)
            + PRICE_STABILITY_WEIGHT * f64::from(price_stability),
    )
}

/// Classifies a trend's lifecycle. Rules are checked in order; the first
/// match wins and anything unmatched is `Growing`.
#[must_use]
pub fn determine_trend_phase(
    days_since_first_seen: i64,
    velocity: u8,
    appearance_count: i64,
) -> TrendPhase {
    if days_since_first_seen < 7 && velocity > 70 && appearance_count < 5 {
        TrendPhase::Emerging
    } else if (7..30).contains(&days_since_first_seen) && velocity > 50 {
        TrendPhase::Growing
    } else if (30..90).contains(&days_since_first_seen) && appearance_count > 10 {
        TrendPhase::Peak
    } else if days_since_first_seen >= 90 || velocity < 30 {
        TrendPhase::Declining
    } else {
        TrendPhase::Growing
    }
}

#[must_use]
pub fn confidence_level(
    prediction_score: u8,
    brand_count: usize,
    appearance_count: i64,
) -> ConfidenceLevel {
    if prediction_score > 70 && brand_count >= 3 && appearance_count >= 5 {
        ConfidenceLevel::High
    } else if prediction_score >= 50 && brand_count >= 2 && appearance_count >= 3 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Estimated peak, counted from first sighting. `None` once the trend has
/// peaked or is declining.
#[must_use]
pub fn predicted_peak_date(
    phase: TrendPhase,
    velocity: u8,
    first_seen_at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let days = match phase {
        TrendPhase::Emerging if velocity > 70 => 14,
        TrendPhase::Emerging => 45,
        TrendPhase::Growing if velocity > 60 => 14,
        TrendPhase::Growing => 28,
        TrendPhase::Peak | TrendPhase::Declining => return None,
    };
    Some(first_seen_at + Duration::days(days))
}

/// Scores one group as of `now`.
#[must_use]
pub fn predict_group(group: &TrendGroup, now: DateTime<Utc>) -> TrendPrediction {
    let brand_count = group.brand_count();
    let velocity = velocity_score(
        group.appearance_count,
        brand_count,
        group.first_seen_at,
        group.last_seen_at,
    );
    let diversity = diversity_score(brand_count, group.country_count());
    let emergence = emergence_score(group.new_in_count, group.sighting_count());
    let price_stability = price_stability_score(&group.prices);
    let prediction_score = combined_score(velocity, diversity, emergence, price_stability);

    let days_since_first_seen = (now - group.first_seen_at).num_days().max(0);
    let phase = determine_trend_phase(days_since_first_seen, velocity, group.appearance_count);

    let first = group.representative();
    TrendPrediction {
        canonical_key: group.canonical_key.clone(),
        product_name: first.product_name.clone(),
        product_type: first.product_type.clone(),
        cut: first.cut.clone(),
        material: first.material.clone(),
        color: first.color.clone(),
        style: first.style.clone(),
        velocity_score: velocity,
        diversity_score: diversity,
        emergence_score: emergence,
        price_stability_score: price_stability,
        prediction_score,
        phase,
        confidence: confidence_level(prediction_score, brand_count, group.appearance_count),
        predicted_peak_date: predicted_peak_date(phase, velocity, group.first_seen_at),
        brand_count,
        appearance_count: group.appearance_count,
    }
}

/// Scores every group and orders the result by prediction score, highest
/// first. Equal scores fall back to canonical key order.
#[must_use]
pub fn predict_groups(groups: &[TrendGroup], now: DateTime<Utc>) -> Vec<TrendPrediction> {
    let mut predictions: Vec<TrendPrediction> =
        groups.iter().map(|g| predict_group(g, now)).collect();
    predictions.sort_by(|a, b| {
        b.prediction_score
            .cmp(&a.prediction_score)
            .then_with(|| a.canonical_key.cmp(&b.canonical_key))
    });
    predictions
}

#[cfg(test)]
#[path = "predict_test.rs"]
mod tests;
