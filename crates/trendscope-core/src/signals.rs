use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::ListingSection;

/// Identity of a persisted sighting: one row per (name, brand, source).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalIdentity {
    pub product_name: String,
    pub brand: String,
    pub source_reference: String,
}

/// A persisted product sighting, refreshed on every repeat observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub id: Uuid,
    pub product_name: String,
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub brand: String,
    pub source_reference: String,
    pub source_section: ListingSection,
    pub price: Decimal,
    pub currency: String,
    pub image_reference: Option<String>,
    pub country: Option<String>,
    pub style: Option<String>,
    /// Grouping key derived from (type, cut, material) at creation time.
    pub canonical_key: String,
    pub appearance_count: i32,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub is_confirmed: bool,
    /// Distinct-brand count at the moment of confirmation; 0 until confirmed.
    pub confirmation_score: i32,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TrendSignal {
    #[must_use]
    pub fn identity(&self) -> SignalIdentity {
        SignalIdentity {
            product_name: self.product_name.clone(),
            brand: self.brand.clone(),
            source_reference: self.source_reference.clone(),
        }
    }
}

/// Fields for a first sighting. Counters and confirmation state start at
/// their initial values in the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrendSignal {
    pub product_name: String,
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub brand: String,
    pub source_reference: String,
    pub source_section: ListingSection,
    pub price: Decimal,
    pub currency: String,
    pub image_reference: Option<String>,
    pub country: Option<String>,
    pub style: Option<String>,
    pub canonical_key: String,
    pub seen_at: DateTime<Utc>,
}

impl NewTrendSignal {
    #[must_use]
    pub fn identity(&self) -> SignalIdentity {
        SignalIdentity {
            product_name: self.product_name.clone(),
            brand: self.brand.clone(),
            source_reference: self.source_reference.clone(),
        }
    }

    /// Materializes the row a repository stores for this first sighting.
    #[must_use]
    pub fn into_signal(self, id: Uuid) -> TrendSignal {
        TrendSignal {
            id,
            product_name: self.product_name,
            product_type: self.product_type,
            cut: self.cut,
            material: self.material,
            color: self.color,
            brand: self.brand,
            source_reference: self.source_reference,
            source_section: self.source_section,
            price: self.price,
            currency: self.currency,
            image_reference: self.image_reference,
            country: self.country,
            style: self.style,
            canonical_key: self.canonical_key,
            appearance_count: 1,
            first_seen_at: self.seen_at,
            last_seen_at: self.seen_at,
            is_confirmed: false,
            confirmation_score: 0,
            confirmed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn into_signal_starts_unconfirmed_with_one_appearance() {
        let seen_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let new_signal = NewTrendSignal {
            product_name: "Hoodie Oversized".to_string(),
            product_type: "Hoodie".to_string(),
            cut: Some("Oversized".to_string()),
            material: Some("Coton".to_string()),
            color: None,
            brand: "A".to_string(),
            source_reference: "https://a.example/hoodie".to_string(),
            source_section: ListingSection::NewIn,
            price: Decimal::new(59, 0),
            currency: "EUR".to_string(),
            image_reference: None,
            country: None,
            style: None,
            canonical_key: "hoodie|oversized|coton".to_string(),
            seen_at,
        };
        let identity = new_signal.identity();
        let signal = new_signal.into_signal(Uuid::nil());

        assert_eq!(signal.identity(), identity);
        assert_eq!(signal.appearance_count, 1);
        assert_eq!(signal.first_seen_at, seen_at);
        assert_eq!(signal.last_seen_at, seen_at);
        assert!(!signal.is_confirmed);
        assert_eq!(signal.confirmation_score, 0);
        assert!(signal.confirmed_at.is_none());
    }
}
