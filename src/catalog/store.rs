//! Loading, validating, and merging catalog sources.

use super::fingerprint::{expected_fingerprints, fingerprint};
use super::types::{Catalog, CatalogIssue, CatalogLoad};
use crate::config::Config;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Loads the merged catalog once and hands out the cached copy afterwards.
///
/// An empty result is not cached, so a later call can pick up repaired
/// files.
#[derive(Debug, Default)]
pub struct CatalogStore {
    cache: OnceLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached catalog, if a non-empty load already happened.
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.cache.get().cloned()
    }

    /// Load every configured source, skipping the ones that fail validation.
    pub fn load(&self, config: &Config) -> CatalogLoad {
        if let Some(catalog) = self.cached() {
            debug!(entries = catalog.len(), "Using cached catalog");
            return CatalogLoad {
                catalog,
                cached: true,
                ..CatalogLoad::default()
            };
        }

        let load = load_sources(config);
        if load.catalog.is_empty() {
            warn!("No catalog source passed validation; catalog is empty");
            return load;
        }

        let catalog = self.cache.get_or_init(|| Arc::clone(&load.catalog));
        CatalogLoad {
            catalog: Arc::clone(catalog),
            ..load
        }
    }
}

/// Uncached load: validate each source and merge in source-name order.
pub fn load_sources(config: &Config) -> CatalogLoad {
    let expected = expected_fingerprints(&config.catalog_fingerprints);
    let mut merged = Catalog::new();
    let mut loaded_sources = Vec::new();
    let mut issues = Vec::new();

    // BTreeMap iteration gives the fixed merge order
    for (source, path) in &config.catalog_files {
        match read_verified(source, path, expected.get(source).map(String::as_str)) {
            Ok(text) => {
                let parsed = parse_catalog(source, &text, &mut issues);
                info!(source = %source, entries = parsed.len(), "Loaded catalog source");
                merged.merge(parsed);
                loaded_sources.push(source.clone());
            }
            Err(issue) => {
                warn!("{}", issue);
                issues.push(issue);
            }
        }
    }

    CatalogLoad {
        catalog: Arc::new(merged),
        loaded_sources,
        issues,
        cached: false,
    }
}

fn read_verified(source: &str, path: &Path, expected: Option<&str>) -> Result<String, CatalogIssue> {
    let bytes = fs::read(path).map_err(|e| CatalogIssue::Unreadable {
        source: source.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let text = String::from_utf8(bytes).map_err(|_| CatalogIssue::NotUtf8 {
        source: source.to_string(),
        path: path.to_path_buf(),
    })?;

    let expected = expected.ok_or_else(|| CatalogIssue::UnknownSource {
        source: source.to_string(),
    })?;

    let actual = fingerprint(&text);
    if actual != expected {
        return Err(CatalogIssue::FingerprintMismatch {
            source: source.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(text)
}

/// Parse `name,rarity` lines. Blank lines are ignored; malformed lines are
/// recorded in `issues` and skipped.
pub fn parse_catalog(source: &str, text: &str, issues: &mut Vec<CatalogIssue>) -> Catalog {
    let mut catalog = Catalog::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [name, rarity] if !name.is_empty() && !rarity.is_empty() => {
                catalog.insert(*name, *rarity);
            }
            _ => {
                let issue = CatalogIssue::MalformedLine {
                    source: source.to_string(),
                    line_number: index + 1,
                    line: line.to_string(),
                };
                warn!("{}", issue);
                issues.push(issue);
            }
        }
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let mut issues = Vec::new();
        let catalog = parse_catalog(
            "gen1",
            "Foo,Common\nbroken line\nBar,Rare,Extra\n\nQux, Rare \n,Common\n",
            &mut issues,
        );

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rarity_of("Foo"), Some("Common"));
        assert_eq!(catalog.rarity_of("Qux"), Some("Rare"));
        assert_eq!(issues.len(), 3);
        assert!(matches!(
            &issues[0],
            CatalogIssue::MalformedLine { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_parse_duplicate_name_within_source_keeps_last() {
        let mut issues = Vec::new();
        let catalog = parse_catalog("gen1", "Foo,Common\nFoo,Rare\n", &mut issues);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rarity_of("Foo"), Some("Rare"));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_parse_keeps_unicode_names() {
        let mut issues = Vec::new();
        let catalog = parse_catalog("gen1", "Nidoran♀,Common\nFarfetch'd,Semi-rare\n", &mut issues);
        assert_eq!(catalog.rarity_of("Nidoran♀"), Some("Common"));
        assert_eq!(catalog.rarity_of("Farfetch'd"), Some("Semi-rare"));
    }

    #[test]
    fn test_store_starts_uncached() {
        let store = CatalogStore::new();
        assert!(store.cached().is_none());
    }
}
