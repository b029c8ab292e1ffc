use serde::{Deserialize, Serialize};

use crate::records::Segment;

/// Canonical attributes inferred from a free-text product name.
///
/// Every field except `product_type` may be absent; the normalizer falls back
/// to a default type so a grouping key can always be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    /// One of the closed type vocabulary, e.g. `"Hoodie"` or `"Cargo"`.
    pub product_type: String,
    /// `"Loose Fit"`, `"Slim Fit"`, `"Regular Fit"`, or `"Wide Leg"`.
    pub cut: Option<String>,
    /// `"Coton"`, `"Denim"`, `"Polyester"`, or `"Lin"`.
    pub material: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    /// Inferred from the listing URL, not the name.
    pub segment: Option<Segment>,
}
