//! Catalog of retail sources handed to the harvesting layer.
//!
//! The trend engine never reads this file. It is an explicit value the caller
//! loads and passes around: the harvester uses the listing URLs, and the CLI
//! uses the per-brand defaults to fill gaps in harvested records.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::records::RawProductRecord;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub brand: String,
    /// ISO 3166-1 alpha-2 country the storefront sells into.
    pub country: Option<String>,
    pub style: Option<String>,
    pub new_in_url: Option<String>,
    pub best_sellers_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

impl SourcesFile {
    /// Finds the source entry for `brand`, compared case-insensitively.
    #[must_use]
    pub fn find(&self, brand: &str) -> Option<&SourceConfig> {
        let wanted = brand.trim().to_lowercase();
        self.sources
            .iter()
            .find(|s| s.brand.trim().to_lowercase() == wanted)
    }
}

/// Load and validate the source catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;

    validate_sources(&sources_file)?;

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_brands = HashSet::new();

    for source in &sources_file.sources {
        if source.brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source brand must be non-empty".to_string(),
            ));
        }

        if let Some(country) = &source.country {
            let valid = country.len() == 2 && country.chars().all(|c| c.is_ascii_uppercase());
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "source '{}' has invalid country '{country}'; expected two uppercase letters",
                    source.brand
                )));
            }
        }

        let has_listing = [&source.new_in_url, &source.best_sellers_url]
            .iter()
            .any(|url| url.as_deref().is_some_and(|u| !u.trim().is_empty()));
        if !has_listing {
            return Err(ConfigError::Validation(format!(
                "source '{}' must define new_in_url or best_sellers_url",
                source.brand
            )));
        }

        if !seen_brands.insert(source.brand.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source brand: '{}'",
                source.brand
            )));
        }
    }

    Ok(())
}

/// Fills a record's missing `country` and `style` from its brand's source entry.
///
/// Values already present on a record are never overwritten. Returns the
/// number of records that received at least one default.
pub fn apply_source_defaults(records: &mut [RawProductRecord], sources: &SourcesFile) -> usize {
    let by_brand: HashMap<String, &SourceConfig> = sources
        .sources
        .iter()
        .map(|s| (s.brand.trim().to_lowercase(), s))
        .collect();

    let mut touched = 0;
    for record in records.iter_mut() {
        let Some(source) = by_brand.get(&record.brand.trim().to_lowercase()) else {
            continue;
        };
        let mut changed = false;
        if is_blank(record.country.as_deref()) && source.country.is_some() {
            record.country.clone_from(&source.country);
            changed = true;
        }
        if is_blank(record.style.as_deref()) && source.style.is_some() {
            record.style.clone_from(&source.style);
            changed = true;
        }
        if changed {
            touched += 1;
        }
    }
    touched
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
