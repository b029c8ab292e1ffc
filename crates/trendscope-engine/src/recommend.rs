//! Buy/avoid classification of confirmed trends.

use std::collections::HashMap;

use trendscope_core::{
    Recommendation, RecommendedTrend, TrendGroupSummary, TrendPhase, TrendPrediction,
};

/// `Avoid` when the trend is declining or its confirmation score has reached
/// the saturation threshold. A missing phase is not treated as declining.
#[must_use]
pub fn classify(
    phase: Option<TrendPhase>,
    confirmation_score: i32,
    saturation_score: i32,
) -> Recommendation {
    if phase == Some(TrendPhase::Declining) || confirmation_score >= saturation_score {
        Recommendation::Avoid
    } else {
        Recommendation::Recommended
    }
}

/// Pairs each group with the phase of its prediction (matched by canonical
/// key) and orders recommended entries before avoided ones, each block by
/// confirmation score descending.
#[must_use]
pub fn recommend(
    groups: Vec<TrendGroupSummary>,
    predictions: &[TrendPrediction],
    saturation_score: i32,
) -> Vec<RecommendedTrend> {
    let phases: HashMap<&str, TrendPhase> = predictions
        .iter()
        .map(|p| (p.canonical_key.as_str(), p.phase))
        .collect();

    let mut entries: Vec<RecommendedTrend> = groups
        .into_iter()
        .map(|group| {
            let phase = phases.get(group.canonical_key.as_str()).copied();
            let recommendation = classify(phase, group.confirmation_score, saturation_score);
            RecommendedTrend {
                group,
                phase,
                recommendation,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        rank(a.recommendation)
            .cmp(&rank(b.recommendation))
            .then_with(|| b.group.confirmation_score.cmp(&a.group.confirmation_score))
    });
    entries
}

fn rank(recommendation: Recommendation) -> u8 {
    match recommendation {
        Recommendation::Recommended => 0,
        Recommendation::Avoid => 1,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use trendscope_core::ConfidenceLevel;

    use super::*;

    fn summary(key: &str, score: i32) -> TrendGroupSummary {
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        TrendGroupSummary {
            canonical_key: key.to_string(),
            product_name: key.to_string(),
            product_type: "Hoodie".to_string(),
            cut: None,
            material: None,
            color: None,
            brands: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            countries: Vec::new(),
            average_price: 50.0,
            currency: "EUR".to_string(),
            image_reference: None,
            segment: None,
            dominant_country: None,
            dominant_style: None,
            is_confirmed: true,
            confirmation_score: score,
            appearance_count: 3,
            signal_count: 3,
            first_seen_at: at,
            last_seen_at: at,
        }
    }

    fn prediction(key: &str, phase: TrendPhase) -> TrendPrediction {
        TrendPrediction {
            canonical_key: key.to_string(),
            product_name: key.to_string(),
            product_type: "Hoodie".to_string(),
            cut: None,
            material: None,
            color: None,
            style: None,
            velocity_score: 50,
            diversity_score: 50,
            emergence_score: 50,
            price_stability_score: 50,
            prediction_score: 50,
            phase,
            confidence: ConfidenceLevel::Low,
            predicted_peak_date: None,
            brand_count: 3,
            appearance_count: 3,
        }
    }

    #[test]
    fn saturation_overrides_growing_phase() {
        assert_eq!(
            classify(Some(TrendPhase::Growing), 6, 5),
            Recommendation::Avoid
        );
        assert_eq!(
            classify(Some(TrendPhase::Growing), 4, 5),
            Recommendation::Recommended
        );
    }

    #[test]
    fn declining_is_avoided_and_missing_phase_is_not() {
        assert_eq!(
            classify(Some(TrendPhase::Declining), 3, 5),
            Recommendation::Avoid
        );
        assert_eq!(classify(None, 3, 5), Recommendation::Recommended);
    }

    #[test]
    fn recommended_block_precedes_avoid_block() {
        let groups = vec![
            summary("saturated", 7),
            summary("fading", 4),
            summary("fresh-low", 3),
            summary("fresh-high", 4),
            summary("unpredicted", 3),
        ];
        let predictions = vec![
            prediction("saturated", TrendPhase::Growing),
            prediction("fading", TrendPhase::Declining),
            prediction("fresh-low", TrendPhase::Emerging),
            prediction("fresh-high", TrendPhase::Growing),
        ];

        let out = recommend(groups, &predictions, 5);
        let keys: Vec<&str> = out.iter().map(|r| r.group.canonical_key.as_str()).collect();

        assert_eq!(
            keys,
            vec!["fresh-high", "fresh-low", "unpredicted", "saturated", "fading"]
        );
        assert_eq!(out[2].phase, None);
        assert_eq!(out[2].recommendation, Recommendation::Recommended);
        assert_eq!(out[4].recommendation, Recommendation::Avoid);
    }
}
