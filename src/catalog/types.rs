//! Catalog data types.

use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Merged creature lookup: name → rarity.
///
/// Keeps first-insertion order of names; overwriting a name keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous rarity if the name existed.
    pub fn insert(&mut self, name: impl Into<String>, rarity: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), rarity.into())
    }

    /// Merge `other` into `self`, `other` winning on collisions.
    pub fn merge(&mut self, other: Catalog) {
        for (name, rarity) in other.entries {
            self.entries.insert(name, rarity);
        }
    }

    pub fn rarity_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by position, in catalog order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &str)> {
        self.entries
            .get_index(index)
            .map(|(name, rarity)| (name.as_str(), rarity.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, rarity)| (name.as_str(), rarity.as_str()))
    }
}

impl<N: Into<String>, R: Into<String>> FromIterator<(N, R)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (N, R)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (name, rarity) in iter {
            catalog.insert(name, rarity);
        }
        catalog
    }
}

/// Why a source or a line was skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// File does not exist or could not be read
    Unreadable {
        source: String,
        path: PathBuf,
        reason: String,
    },
    /// File is not valid UTF-8
    NotUtf8 { source: String, path: PathBuf },
    /// No expected fingerprint is known for this source name
    UnknownSource { source: String },
    /// Content fingerprint differs from the expected one
    FingerprintMismatch {
        source: String,
        expected: String,
        actual: String,
    },
    /// A line that is not exactly `name,rarity`
    MalformedLine {
        source: String,
        line_number: usize,
        line: String,
    },
}

impl CatalogIssue {
    /// Whether the whole source was dropped (as opposed to a single line).
    pub fn drops_source(&self) -> bool {
        !matches!(self, CatalogIssue::MalformedLine { .. })
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::Unreadable {
                source,
                path,
                reason,
            } => write!(
                f,
                "Catalog {} not loaded: {} ({})",
                source,
                path.display(),
                reason
            ),
            CatalogIssue::NotUtf8 { source, path } => {
                write!(f, "Catalog {} is not UTF-8: {}", source, path.display())
            }
            CatalogIssue::UnknownSource { source } => {
                write!(f, "Catalog {} has no pinned fingerprint", source)
            }
            CatalogIssue::FingerprintMismatch {
                source,
                expected,
                actual,
            } => write!(
                f,
                "Catalog {} may have been modified. Hash verification failed (expected {}, actual {})",
                source, expected, actual
            ),
            CatalogIssue::MalformedLine {
                source,
                line_number,
                line,
            } => write!(
                f,
                "Invalid entry in catalog {} line {}: {}",
                source, line_number, line
            ),
        }
    }
}

/// Outcome of a catalog load.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Arc<Catalog>,
    /// Sources that contributed entries, in merge order
    pub loaded_sources: Vec<String>,
    pub issues: Vec<CatalogIssue>,
    /// True when the catalog came from the cache
    pub cached: bool,
}
