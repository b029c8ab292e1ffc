//! Canonical grouping key.
//!
//! The key keeps only (type, cut, material). Color, style, brand, price and
//! the exact product name are discarded, so two listings of the same garment
//! shape from different brands land in one group.

use trendscope_core::{RawProductRecord, TrendSignal};

use crate::normalize::resolve_attributes;

/// Builds `type|cut|material` from trimmed, lower-cased parts, with absent
/// parts as empty strings.
#[must_use]
pub fn canonical_key(product_type: &str, cut: Option<&str>, material: Option<&str>) -> String {
    format!(
        "{}|{}|{}",
        product_type.trim(),
        cut.map(str::trim).unwrap_or_default(),
        material.map(str::trim).unwrap_or_default()
    )
    .to_lowercase()
}

/// Key for a raw record after attribute resolution.
#[must_use]
pub fn record_key(record: &RawProductRecord) -> String {
    let resolved = resolve_attributes(record);
    canonical_key(
        &resolved.product_type,
        resolved.cut.as_deref(),
        resolved.material.as_deref(),
    )
}

/// Key recomputed from a stored signal's attributes.
#[must_use]
pub fn signal_key(signal: &TrendSignal) -> String {
    canonical_key(
        &signal.product_type,
        signal.cut.as_deref(),
        signal.material.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use trendscope_core::ListingSection;

    use super::*;

    #[test]
    fn joins_and_lowercases() {
        assert_eq!(
            canonical_key("Hoodie", Some("Oversized"), Some("Coton")),
            "hoodie|oversized|coton"
        );
    }

    #[test]
    fn missing_parts_become_empty() {
        assert_eq!(canonical_key("Cargo", None, None), "cargo||");
        assert_eq!(canonical_key("Short", None, Some("Lin")), "short||lin");
    }

    #[test]
    fn same_inputs_same_key() {
        let a = canonical_key("Veste", Some("Slim Fit"), Some("Denim"));
        let b = canonical_key("VESTE", Some("slim fit"), Some("DENIM"));
        assert_eq!(a, b);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            canonical_key("  Hoodie ", Some(" Oversized\t"), Some("Coton  ")),
            "hoodie|oversized|coton"
        );
        assert_eq!(canonical_key("Cargo", Some("   "), None), "cargo||");
    }

    #[test]
    fn record_key_ignores_color_brand_and_price() {
        let base = RawProductRecord {
            name: "Hoodie noir".to_string(),
            product_type: "Hoodie".to_string(),
            cut: Some("Oversized".to_string()),
            material: Some("Coton".to_string()),
            color: Some("Noir".to_string()),
            price: Decimal::new(59, 0),
            currency: "EUR".to_string(),
            image_reference: None,
            source_reference: "https://a.example/hoodie".to_string(),
            brand: "A".to_string(),
            section: ListingSection::NewIn,
            country: None,
            style: None,
        };
        let mut other = base.clone();
        other.name = "Sweat capuche blanc".to_string();
        other.color = Some("Blanc".to_string());
        other.brand = "B".to_string();
        other.price = Decimal::new(120, 0);

        assert_eq!(record_key(&base), record_key(&other));
        assert_eq!(record_key(&base), "hoodie|oversized|coton");
    }
}
