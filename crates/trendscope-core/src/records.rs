use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Retail listing a product was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSection {
    NewIn,
    BestSellers,
}

impl ListingSection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListingSection::NewIn => "new_in",
            ListingSection::BestSellers => "best_sellers",
        }
    }

    /// Parses the storage representation. Unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_in" => Some(ListingSection::NewIn),
            "best_sellers" => Some(ListingSection::BestSellers),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience segment inferred from a listing URL.
///
/// Variant order is the tie-break preference for majority votes and the
/// primary sort order for confirmed trend lists: femme, homme, enfant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Femme,
    Homme,
    Enfant,
}

impl Segment {
    /// Every segment in preference order.
    pub const PREFERENCE: [Segment; 3] = [Segment::Femme, Segment::Homme, Segment::Enfant];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Femme => "femme",
            Segment::Homme => "homme",
            Segment::Enfant => "enfant",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "femme" => Some(Segment::Femme),
            "homme" => Some(Segment::Homme),
            "enfant" => Some(Segment::Enfant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product listing as delivered by the harvesting layer.
///
/// `product_type` is free text here; the engine resolves it (and any missing
/// cut/material/color/style) through the normalizer before grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub cut: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub price: Decimal,
    pub currency: String,
    #[serde(default)]
    pub image_reference: Option<String>,
    /// Listing URL; part of the signal identity and the segment hint.
    pub source_reference: String,
    pub brand: String,
    pub section: ListingSection,
    /// ISO 3166-1 alpha-2 code, e.g. `"FR"`.
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Decimal places kept for stored prices; matches `NUMERIC(12, 2)`.
pub const PRICE_SCALE: u32 = 2;

impl RawProductRecord {
    /// Price as it will be stored: rounded half away from zero to
    /// [`PRICE_SCALE`] places, the same way Postgres rounds `NUMERIC`.
    #[must_use]
    pub fn stored_price(&self) -> Decimal {
        self.price
            .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Returns the reason this record must be dropped, if any.
    ///
    /// A record is unusable when its name, brand, or source reference is blank
    /// or its stored price is not strictly positive.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("blank product name")
        } else if self.stored_price() <= Decimal::ZERO {
            Some("non-positive price")
        } else if self.brand.trim().is_empty() {
            Some("blank brand")
        } else if self.source_reference.trim().is_empty() {
            Some("blank source reference")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> RawProductRecord {
        RawProductRecord {
            name: "Hoodie oversize en coton".to_string(),
            product_type: "Hoodie".to_string(),
            cut: None,
            material: None,
            color: None,
            price: Decimal::new(5900, 2),
            currency: "EUR".to_string(),
            image_reference: None,
            source_reference: "https://shop.example/fr/homme/hoodie-1".to_string(),
            brand: "Atelier Nord".to_string(),
            section: ListingSection::NewIn,
            country: Some("FR".to_string()),
            style: None,
        }
    }

    #[test]
    fn valid_record_has_no_rejection_reason() {
        assert!(make_record().rejection_reason().is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut record = make_record();
        record.name = "   ".to_string();
        assert_eq!(record.rejection_reason(), Some("blank product name"));
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut record = make_record();
        record.price = Decimal::ZERO;
        assert_eq!(record.rejection_reason(), Some("non-positive price"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut record = make_record();
        record.price = Decimal::new(-100, 2);
        assert_eq!(record.rejection_reason(), Some("non-positive price"));
    }

    #[test]
    fn price_that_rounds_to_zero_is_rejected() {
        let mut record = make_record();
        record.price = Decimal::new(1, 3);
        assert_eq!(record.stored_price(), Decimal::ZERO);
        assert_eq!(record.rejection_reason(), Some("non-positive price"));

        record.price = Decimal::new(5, 3);
        assert_eq!(record.stored_price(), Decimal::new(1, 2));
        assert!(record.rejection_reason().is_none());
    }

    #[test]
    fn section_round_trips_through_storage_string() {
        for section in [ListingSection::NewIn, ListingSection::BestSellers] {
            assert_eq!(ListingSection::parse(section.as_str()), Some(section));
        }
        assert_eq!(ListingSection::parse("clearance"), None);
    }

    #[test]
    fn segment_preference_matches_ordering() {
        let mut sorted = vec![Segment::Enfant, Segment::Femme, Segment::Homme];
        sorted.sort();
        assert_eq!(sorted, Segment::PREFERENCE.to_vec());
    }

    #[test]
    fn deserializes_feed_json() {
        let json = r#"{
            "name": "Cargo wide leg",
            "type": "",
            "price": "79.90",
            "currency": "EUR",
            "source_reference": "https://shop.example/femme/cargo",
            "brand": "Maison Sable",
            "section": "best_sellers"
        }"#;
        let record: RawProductRecord = serde_json::from_str(json).expect("valid record json");
        assert_eq!(record.section, ListingSection::BestSellers);
        assert_eq!(record.price, Decimal::new(7990, 2));
        assert!(record.cut.is_none());
        assert!(record.country.is_none());
    }
}
