//! Free-text product names to [`trendscope_core::NormalizedProduct`].
//!
//! Each attribute has its own ordered rule table. A rule fires when any of its
//! keywords occurs in the lower-cased, accent-folded name; the first firing
//! rule wins and no table consults another table's result. Keywords are plain
//! ASCII. Keywords padded with spaces only match whole words, because the name
//! is padded and stripped of punctuation before matching.

use std::sync::LazyLock;

use regex::Regex;
use trendscope_core::{NormalizedProduct, RawProductRecord, Segment};

/// One entry of an ordered rule table.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub value: &'static str,
    pub keywords: &'static [&'static str],
}

const fn rule(value: &'static str, keywords: &'static [&'static str]) -> KeywordRule {
    KeywordRule { value, keywords }
}

/// Type used when no type rule fires.
pub const DEFAULT_PRODUCT_TYPE: &str = "T-shirt";

pub const TYPE_RULES: &[KeywordRule] = &[
    rule(
        "Hoodie",
        &["hoodie", "sweatshirt", "sweat a capuche", "capuche"],
    ),
    rule("T-shirt", &["t-shirt", "tshirt", "tee-shirt", " tee ", " tees "]),
    rule("Cargo", &["cargo"]),
    rule("Short", &["short", "bermuda"]),
    rule(
        "Veste",
        &["veste", "jacket", "blouson", "bomber", "parka", "manteau", " coat "],
    ),
    rule(
        "Pantalon",
        &["pantalon", " pants ", "trousers", "jogger", "jogging", "chino", " jean ", " jeans "],
    ),
];

pub const CUT_RULES: &[KeywordRule] = &[
    rule(
        "Wide Leg",
        &["wide leg", "wide-leg", "jambe large", "palazzo", " flare "],
    ),
    rule(
        "Loose Fit",
        &["oversized", "oversize", "loose", "baggy", "boxy", " ample "],
    ),
    rule("Slim Fit", &["slim", "skinny", "ajuste", "fitted"]),
    rule("Regular Fit", &["regular", "straight", "coupe droite", " droit "]),
];

pub const MATERIAL_RULES: &[KeywordRule] = &[
    rule("Denim", &["denim", " jean ", " jeans "]),
    rule("Coton", &["coton", "cotton"]),
    rule("Lin", &["linen", " lin "]),
    rule("Polyester", &["polyester", "polyamide", "nylon"]),
];

pub const COLOR_RULES: &[KeywordRule] = &[
    rule("Noir", &["noir", "black"]),
    rule("Blanc", &["blanc", "white"]),
    rule("Gris", &["gris", "grey", "gray", "anthracite"]),
    rule("Beige", &["beige", "ecru", " sand ", " sable ", "creme", "cream"]),
    rule("Bleu", &["bleu", "blue", "navy", "marine", "indigo"]),
    rule("Rouge", &["rouge", " red ", "bordeaux", "burgundy"]),
    rule("Vert", &[" vert ", "green", "kaki", "khaki", "olive"]),
    rule("Marron", &["marron", "brown", "chocolat", "camel"]),
    rule("Rose", &[" rose ", "pink"]),
    rule("Jaune", &["jaune", "yellow"]),
];

pub const STYLE_RULES: &[KeywordRule] = &[
    rule("Streetwear", &["streetwear", "street", "urban", "skate", "graphic"]),
    rule("Y2K", &["y2k", "vintage", "retro", " 90s ", "annees 90"]),
    rule("Luxe", &["luxe", "luxury", "premium", "cachemire", "cashmere", " soie ", " silk "]),
    rule("Minimaliste", &["minimal", "essential", "essentiel", "basique", " basic "]),
    rule("Sportswear", &["sport", "running", "training", " track ", "athletic"]),
    rule("Casual", &["casual", "everyday", "weekend"]),
];

static SEGMENT_RULES: LazyLock<[(Segment, Regex); 3]> = LazyLock::new(|| {
    [
        (
            Segment::Homme,
            Regex::new(r"(?i)\b(homme|hommes|men|mens|man|boys)\b").expect("valid homme regex"),
        ),
        (
            Segment::Femme,
            Regex::new(r"(?i)\b(femme|femmes|woman|women|womens|ladies|girls)\b")
                .expect("valid femme regex"),
        ),
        (
            Segment::Enfant,
            Regex::new(r"(?i)\b(enfant|enfants|kids|child|children)\b")
                .expect("valid enfant regex"),
        ),
    ]
});

/// Strips the diacritic from a lower-case Latin letter.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Lower-cases and accent-folds `text`, turns punctuation (including `_`) into
/// spaces, and pads both ends so space-delimited keywords match whole words.
fn prepare(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match c {
            'æ' => cleaned.push_str("ae"),
            'œ' => cleaned.push_str("oe"),
            c if c.is_alphanumeric() || c == '-' || c == '\'' => cleaned.push(fold_accent(c)),
            _ => cleaned.push(' '),
        }
    }
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {collapsed} ")
}

/// Returns the value of the first rule with a keyword in `prepared`.
fn first_match(prepared: &str, rules: &[KeywordRule]) -> Option<&'static str> {
    rules
        .iter()
        .find(|r| r.keywords.iter().any(|k| prepared.contains(k)))
        .map(|r| r.value)
}

#[must_use]
pub fn infer_product_type(name: &str) -> &'static str {
    first_match(&prepare(name), TYPE_RULES).unwrap_or(DEFAULT_PRODUCT_TYPE)
}

#[must_use]
pub fn infer_cut(name: &str) -> Option<&'static str> {
    first_match(&prepare(name), CUT_RULES)
}

#[must_use]
pub fn infer_material(name: &str) -> Option<&'static str> {
    first_match(&prepare(name), MATERIAL_RULES)
}

#[must_use]
pub fn infer_color(name: &str) -> Option<&'static str> {
    first_match(&prepare(name), COLOR_RULES)
}

#[must_use]
pub fn infer_style(name: &str) -> Option<&'static str> {
    first_match(&prepare(name), STYLE_RULES)
}

/// Infers the audience segment from path-like tokens in a listing URL.
///
/// Tokens are matched on word boundaries, so `/women/` does not count as `men`.
/// Underscores separate tokens like any other punctuation. Segments are tried
/// in the order homme, femme, enfant.
#[must_use]
pub fn infer_segment(source_reference: &str) -> Option<Segment> {
    let prepared = prepare(source_reference);
    SEGMENT_RULES
        .iter()
        .find(|(_, re)| re.is_match(&prepared))
        .map(|(segment, _)| *segment)
}

/// Normalizes a product name. Never fails: unmatched fields are `None`, and
/// the type falls back to [`DEFAULT_PRODUCT_TYPE`].
#[must_use]
pub fn normalize(name: &str, source_reference: &str) -> NormalizedProduct {
    let prepared = prepare(name);
    NormalizedProduct {
        product_type: first_match(&prepared, TYPE_RULES)
            .unwrap_or(DEFAULT_PRODUCT_TYPE)
            .to_string(),
        cut: first_match(&prepared, CUT_RULES).map(str::to_string),
        material: first_match(&prepared, MATERIAL_RULES).map(str::to_string),
        color: first_match(&prepared, COLOR_RULES).map(str::to_string),
        style: first_match(&prepared, STYLE_RULES).map(str::to_string),
        segment: infer_segment(source_reference),
    }
}

/// Attributes of a raw record after gap-filling from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttributes {
    pub product_type: String,
    pub cut: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
}

/// Resolves a raw record's attributes: non-blank harvested values win, and
/// every blank or missing one is taken from [`normalize`] on the name.
#[must_use]
pub fn resolve_attributes(record: &RawProductRecord) -> ResolvedAttributes {
    let inferred = normalize(&record.name, &record.source_reference);
    let explicit = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    ResolvedAttributes {
        product_type: explicit(Some(record.product_type.as_str()))
            .unwrap_or(inferred.product_type),
        cut: explicit(record.cut.as_deref()).or(inferred.cut),
        material: explicit(record.material.as_deref()).or(inferred.material),
        color: explicit(record.color.as_deref()).or(inferred.color),
        style: explicit(record.style.as_deref()).or(inferred.style),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
