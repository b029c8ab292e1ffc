use chrono::{Duration, TimeZone, Utc};
use trendscope_core::{ConfidenceLevel, ListingSection, TrendPhase};

use super::*;
use crate::group::group_by_key;
use crate::group::tests::make_signal;

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, n, 0, 0, 0).unwrap()
}

#[test]
fn velocity_floors_span_at_one_day() {
    // 2 sightings x 1 brand within an hour behaves like a one-day span
    let v = velocity_score(2, 1, day(1), day(1) + Duration::hours(1));
    assert_eq!(v, 100);
    let v = velocity_score(1, 1, day(1), day(1));
    assert_eq!(v, 50);
}

#[test]
fn velocity_decays_with_span() {
    // 3 x 2 / 10 days = 0.6 -> 30
    assert_eq!(velocity_score(3, 2, day(1), day(11)), 30);
    // fractional span: 1 x 1 / 4 days = 0.25 -> 12.5 -> 13
    assert_eq!(velocity_score(1, 1, day(1), day(5)), 13);
}

#[test]
fn diversity_weights_brands_over_countries() {
    assert_eq!(diversity_score(5, 10), 100);
    assert_eq!(diversity_score(5, 0), 60);
    assert_eq!(diversity_score(0, 10), 40);
    // 3/5 -> 60, 2/10 -> 20: 36 + 8
    assert_eq!(diversity_score(3, 2), 44);
    assert_eq!(diversity_score(12, 40), 100);
}

#[test]
fn emergence_is_new_in_share() {
    assert_eq!(emergence_score(4, 4), 100);
    assert_eq!(emergence_score(0, 4), 0);
    assert_eq!(emergence_score(1, 3), 33);
    assert_eq!(emergence_score(0, 0), 0);
}

#[test]
fn price_stability_defaults_to_neutral() {
    assert_eq!(price_stability_score(&[]), 50);
    assert_eq!(price_stability_score(&[40.0, 40.0]), 100);
    // cv 0.2 -> 100 - 40
    assert_eq!(price_stability_score(&[40.0, 60.0]), 60);
    // cv >= 0.5 bottoms out
    assert_eq!(price_stability_score(&[1.0, 99.0]), 0);
}

#[test]
fn combined_score_uses_fixed_weights() {
    assert_eq!(combined_score(100, 100, 100, 100), 100);
    assert_eq!(combined_score(0, 0, 0, 0), 0);
    // 30 + 15 + 25 + 10
    assert_eq!(combined_score(100, 60, 100, 50), 80);
}

#[test]
fn phase_decision_list_in_order() {
    assert_eq!(determine_trend_phase(3, 85, 2), TrendPhase::Emerging);
    // fast but too many appearances to be emerging; age < 7 so not growing
    // either, and velocity >= 30 keeps it out of declining
    assert_eq!(determine_trend_phase(3, 85, 7), TrendPhase::Growing);
    assert_eq!(determine_trend_phase(10, 55, 20), TrendPhase::Growing);
    assert_eq!(determine_trend_phase(45, 10, 11), TrendPhase::Peak);
    assert_eq!(determine_trend_phase(45, 10, 10), TrendPhase::Declining);
    assert_eq!(determine_trend_phase(120, 99, 1), TrendPhase::Declining);
    assert_eq!(determine_trend_phase(2, 20, 1), TrendPhase::Declining);
    assert_eq!(determine_trend_phase(20, 40, 3), TrendPhase::Growing);
}

#[test]
fn phase_is_total_over_inputs() {
    for days in [-1, 0, 6, 7, 29, 30, 89, 90, 365] {
        for velocity in [0, 29, 30, 50, 51, 70, 71, 100] {
            for appearances in [0, 1, 4, 5, 10, 11, 1_000] {
                // every triple maps to some phase without panicking
                let _ = determine_trend_phase(days, velocity, appearances);
            }
        }
    }
}

#[test]
fn confidence_thresholds() {
    assert_eq!(confidence_level(71, 3, 5), ConfidenceLevel::High);
    assert_eq!(confidence_level(70, 3, 5), ConfidenceLevel::Medium);
    assert_eq!(confidence_level(90, 2, 3), ConfidenceLevel::Medium);
    assert_eq!(confidence_level(90, 5, 2), ConfidenceLevel::Low);
    assert_eq!(confidence_level(49, 5, 50), ConfidenceLevel::Low);
}

#[test]
fn peak_date_by_phase_and_velocity() {
    let first = day(1);
    assert_eq!(
        predicted_peak_date(TrendPhase::Emerging, 85, first),
        Some(first + Duration::days(14))
    );
    assert_eq!(
        predicted_peak_date(TrendPhase::Emerging, 70, first),
        Some(first + Duration::days(45))
    );
    assert_eq!(
        predicted_peak_date(TrendPhase::Growing, 61, first),
        Some(first + Duration::days(14))
    );
    assert_eq!(
        predicted_peak_date(TrendPhase::Growing, 60, first),
        Some(first + Duration::days(28))
    );
    assert_eq!(predicted_peak_date(TrendPhase::Peak, 99, first), None);
    assert_eq!(predicted_peak_date(TrendPhase::Declining, 99, first), None);
}

#[test]
fn young_fast_group_is_emerging_with_low_confidence() {
    // Two brands, one sighting each, both three days old.
    let mut a = make_signal("hoodie|oversized|coton", "A", 59);
    let mut b = make_signal("hoodie|oversized|coton", "B", 65);
    a.first_seen_at = day(10);
    a.last_seen_at = day(10);
    b.first_seen_at = day(10);
    b.last_seen_at = day(10) + Duration::hours(6);
    let group = group_by_key(vec![a, b]).remove(0);

    let prediction = predict_group(&group, day(13));

    // 2 x 2 / 1 day -> clamped to 100
    assert_eq!(prediction.velocity_score, 100);
    assert_eq!(prediction.phase, TrendPhase::Emerging);
    assert_eq!(prediction.predicted_peak_date, Some(day(10) + Duration::days(14)));
    assert_eq!(prediction.confidence, ConfidenceLevel::Low);
    assert_eq!(prediction.emergence_score, 100);
    assert_eq!(prediction.brand_count, 2);
    assert_eq!(prediction.product_type, "Hoodie");
}

#[test]
fn old_best_seller_group_declines_without_peak_date() {
    let mut a = make_signal("tee||", "A", 30);
    a.source_section = ListingSection::BestSellers;
    a.first_seen_at = day(1) - Duration::days(120);
    a.last_seen_at = day(1);
    let group = group_by_key(vec![a]).remove(0);

    let prediction = predict_group(&group, day(2));

    assert_eq!(prediction.phase, TrendPhase::Declining);
    assert_eq!(prediction.predicted_peak_date, None);
    assert_eq!(prediction.emergence_score, 0);
    assert!(prediction.prediction_score <= 100);
}

#[test]
fn predictions_sorted_by_score_then_key() {
    let fast = {
        let mut s = make_signal("b-fast", "A", 50);
        s.appearance_count = 4;
        s
    };
    let slow_a = {
        let mut s = make_signal("z-slow", "A", 50);
        s.source_section = ListingSection::BestSellers;
        s.first_seen_at = day(1);
        s.last_seen_at = day(28);
        s
    };
    let slow_b = {
        let mut s = make_signal("a-slow", "A", 50);
        s.source_section = ListingSection::BestSellers;
        s.first_seen_at = day(1);
        s.last_seen_at = day(28);
        s
    };
    let groups = group_by_key(vec![slow_a, fast, slow_b]);

    let predictions = predict_groups(&groups, day(28));
    let keys: Vec<&str> = predictions
        .iter()
        .map(|p| p.canonical_key.as_str())
        .collect();

    assert_eq!(keys, vec!["b-fast", "a-slow", "z-slow"]);
    assert!(predictions[0].prediction_score > predictions[1].prediction_score);
    assert_eq!(
        predictions[1].prediction_score,
        predictions[2].prediction_score
    );
}
