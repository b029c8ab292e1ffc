use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::Segment;

/// Coarse lifecycle classification of a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPhase {
    Emerging,
    Growing,
    Peak,
    Declining,
}

impl TrendPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrendPhase::Emerging => "emerging",
            TrendPhase::Growing => "growing",
            TrendPhase::Peak => "peak",
            TrendPhase::Declining => "declining",
        }
    }
}

impl std::fmt::Display for TrendPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Recommended,
    Avoid,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Recommended => write!(f, "recommended"),
            Recommendation::Avoid => write!(f, "avoid"),
        }
    }
}

/// Optional filters for confirmed-trend listings.
///
/// `country`, `style`, and `product_type` are applied at the signal level;
/// `segment` is applied after grouping, against the group's majority segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendFilters {
    pub country: Option<String>,
    pub style: Option<String>,
    pub product_type: Option<String>,
    pub segment: Option<Segment>,
}

/// Counts reported by one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub created: usize,
    pub updated: usize,
    /// Signals newly flipped to confirmed by this batch's confirmation pass.
    pub confirmed: usize,
    /// Malformed records dropped before reaching the store.
    pub skipped: usize,
}

/// Signals sharing a canonical key, merged for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendGroupSummary {
    pub canonical_key: String,
    pub product_name: String,
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    /// Distinct brands, sorted.
    pub brands: Vec<String>,
    /// Distinct countries, sorted.
    pub countries: Vec<String>,
    pub average_price: f64,
    pub currency: String,
    pub image_reference: Option<String>,
    pub segment: Option<Segment>,
    pub dominant_country: Option<String>,
    pub dominant_style: Option<String>,
    pub is_confirmed: bool,
    pub confirmation_score: i32,
    pub appearance_count: i64,
    pub signal_count: usize,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Forward-looking score for one canonical key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPrediction {
    pub canonical_key: String,
    pub product_name: String,
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub velocity_score: u8,
    pub diversity_score: u8,
    pub emergence_score: u8,
    pub price_stability_score: u8,
    pub prediction_score: u8,
    pub phase: TrendPhase,
    pub confidence: ConfidenceLevel,
    pub predicted_peak_date: Option<DateTime<Utc>>,
    pub brand_count: usize,
    pub appearance_count: i64,
}

/// A confirmed trend group paired with its buy/avoid classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedTrend {
    pub group: TrendGroupSummary,
    /// Phase of the matching prediction, if the key was predicted.
    pub phase: Option<TrendPhase>,
    pub recommendation: Recommendation,
}
