//! Grouping of stored signals by canonical key.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use trendscope_core::{ListingSection, TrendGroupSummary, TrendSignal};

use crate::normalize::infer_segment;
use crate::stats::{majority_segment, mean, most_common};

/// Signals sharing one canonical key, with the aggregates the predictor and
/// the listing need.
#[derive(Debug, Clone)]
pub struct TrendGroup {
    pub canonical_key: String,
    /// Members in the order they were read from the store.
    pub members: Vec<TrendSignal>,
    pub brands: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub prices: Vec<f64>,
    pub new_in_count: usize,
    pub best_sellers_count: usize,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    /// Sum of member appearance counts.
    pub appearance_count: i64,
}

impl TrendGroup {
    fn new(first: TrendSignal) -> Self {
        let mut group = Self {
            canonical_key: first.canonical_key.clone(),
            members: Vec::new(),
            brands: BTreeSet::new(),
            countries: BTreeSet::new(),
            prices: Vec::new(),
            new_in_count: 0,
            best_sellers_count: 0,
            first_seen_at: first.first_seen_at,
            last_seen_at: first.last_seen_at,
            appearance_count: 0,
        };
        group.push(first);
        group
    }

    fn push(&mut self, signal: TrendSignal) {
        self.brands.insert(signal.brand.clone());
        if let Some(country) = signal.country.as_deref().filter(|c| !c.is_empty()) {
            self.countries.insert(country.to_string());
        }
        if let Some(price) = signal.price.to_f64() {
            self.prices.push(price);
        }
        match signal.source_section {
            ListingSection::NewIn => self.new_in_count += 1,
            ListingSection::BestSellers => self.best_sellers_count += 1,
        }
        self.first_seen_at = self.first_seen_at.min(signal.first_seen_at);
        self.last_seen_at = self.last_seen_at.max(signal.last_seen_at);
        self.appearance_count += i64::from(signal.appearance_count);
        self.members.push(signal);
    }

    #[must_use]
    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Number of member signals; each is one sighting row.
    #[must_use]
    pub fn sighting_count(&self) -> usize {
        self.members.len()
    }

    /// The member all representative attributes are taken from.
    #[must_use]
    pub fn representative(&self) -> &TrendSignal {
        &self.members[0]
    }

    /// Merges the group into its display form.
    #[must_use]
    pub fn summarize(&self) -> TrendGroupSummary {
        let first = self.representative();

        let image_reference = self
            .members
            .iter()
            .filter(|m| m.image_reference.is_some())
            .max_by_key(|m| m.last_seen_at)
            .and_then(|m| m.image_reference.clone());

        TrendGroupSummary {
            canonical_key: self.canonical_key.clone(),
            product_name: first.product_name.clone(),
            product_type: first.product_type.clone(),
            cut: first.cut.clone(),
            material: first.material.clone(),
            color: first.color.clone(),
            brands: self.brands.iter().cloned().collect(),
            countries: self.countries.iter().cloned().collect(),
            average_price: mean(&self.prices).unwrap_or(0.0),
            currency: first.currency.clone(),
            image_reference,
            segment: majority_segment(
                self.members
                    .iter()
                    .map(|m| infer_segment(&m.source_reference)),
            ),
            dominant_country: most_common(
                self.members.iter().filter_map(|m| m.country.clone()),
            ),
            dominant_style: most_common(self.members.iter().filter_map(|m| m.style.clone())),
            is_confirmed: self.members.iter().any(|m| m.is_confirmed),
            confirmation_score: self
                .members
                .iter()
                .map(|m| m.confirmation_score)
                .max()
                .unwrap_or(0),
            appearance_count: self.appearance_count,
            signal_count: self.members.len(),
            first_seen_at: self.first_seen_at,
            last_seen_at: self.last_seen_at,
        }
    }
}

/// Groups signals by their stored canonical key.
///
/// Groups come out in order of their first member, and members keep their
/// input order.
#[must_use]
pub fn group_by_key(signals: Vec<TrendSignal>) -> Vec<TrendGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<TrendGroup> = Vec::new();

    for signal in signals {
        match index.get(&signal.canonical_key) {
            Some(&idx) => groups[idx].push(signal),
            None => {
                index.insert(signal.canonical_key.clone(), groups.len());
                groups.push(TrendGroup::new(signal));
            }
        }
    }

    groups
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use trendscope_core::Segment;
    use uuid::Uuid;

    use super::*;

    pub(crate) fn make_signal(key: &str, brand: &str, price: i64) -> TrendSignal {
        let seen = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap();
        TrendSignal {
            id: Uuid::new_v4(),
            product_name: format!("{key} by {brand}"),
            product_type: "Hoodie".to_string(),
            cut: Some("Oversized".to_string()),
            material: Some("Coton".to_string()),
            color: None,
            brand: brand.to_string(),
            source_reference: format!("https://{brand}.example/p"),
            source_section: ListingSection::NewIn,
            price: Decimal::new(price, 0),
            currency: "EUR".to_string(),
            image_reference: None,
            country: None,
            style: None,
            canonical_key: key.to_string(),
            appearance_count: 1,
            first_seen_at: seen,
            last_seen_at: seen,
            is_confirmed: false,
            confirmation_score: 0,
            confirmed_at: None,
        }
    }

    #[test]
    fn groups_preserve_first_appearance_order() {
        let groups = group_by_key(vec![
            make_signal("b|", "x", 10),
            make_signal("a|", "x", 10),
            make_signal("b|", "y", 10),
        ]);
        let keys: Vec<&str> = groups.iter().map(|g| g.canonical_key.as_str()).collect();
        assert_eq!(keys, vec!["b|", "a|"]);
        assert_eq!(groups[0].sighting_count(), 2);
        assert_eq!(groups[0].brand_count(), 2);
    }

    #[test]
    fn aggregates_brands_countries_sections_and_bounds() {
        let mut a = make_signal("k", "A", 59);
        a.country = Some("FR".to_string());
        a.appearance_count = 3;
        let mut b = make_signal("k", "B", 65);
        b.country = Some("DE".to_string());
        b.source_section = ListingSection::BestSellers;
        b.first_seen_at -= Duration::days(2);
        let mut c = make_signal("k", "A", 62);
        c.country = Some("FR".to_string());
        c.last_seen_at += Duration::days(1);

        let group = group_by_key(vec![a.clone(), b.clone(), c.clone()]).remove(0);

        assert_eq!(group.brand_count(), 2);
        assert_eq!(group.country_count(), 2);
        assert_eq!(group.new_in_count, 2);
        assert_eq!(group.best_sellers_count, 1);
        assert_eq!(group.appearance_count, 5);
        assert_eq!(group.first_seen_at, b.first_seen_at);
        assert_eq!(group.last_seen_at, c.last_seen_at);
        assert_eq!(group.prices, vec![59.0, 65.0, 62.0]);
    }

    #[test]
    fn summary_merges_members() {
        let mut a = make_signal("hoodie|oversized|coton", "A", 59);
        a.source_reference = "https://a.example/homme/h".to_string();
        a.image_reference = Some("a.jpg".to_string());
        a.country = Some("FR".to_string());
        a.is_confirmed = true;
        a.confirmation_score = 3;
        let mut b = make_signal("hoodie|oversized|coton", "B", 65);
        b.source_reference = "https://b.example/femme/h".to_string();
        b.image_reference = Some("b.jpg".to_string());
        b.last_seen_at += Duration::hours(5);
        b.country = Some("BE".to_string());
        b.is_confirmed = true;
        b.confirmation_score = 4;
        let mut c = make_signal("hoodie|oversized|coton", "C", 62);
        c.last_seen_at += Duration::days(3);

        let summary = group_by_key(vec![a, b, c]).remove(0).summarize();

        assert_eq!(summary.brands, vec!["A", "B", "C"]);
        assert_eq!(summary.countries, vec!["BE", "FR"]);
        assert!((summary.average_price - 62.0).abs() < 1e-9);
        assert_eq!(summary.image_reference.as_deref(), Some("b.jpg"));
        // one homme, one femme, one unknown: tie goes to femme
        assert_eq!(summary.segment, Some(Segment::Femme));
        assert_eq!(summary.dominant_country.as_deref(), Some("FR"));
        assert!(summary.is_confirmed);
        assert_eq!(summary.confirmation_score, 4);
        assert_eq!(summary.signal_count, 3);
        assert_eq!(summary.product_name, "hoodie|oversized|coton by A");
    }
}
