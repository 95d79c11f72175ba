//! Content fingerprints for catalog sources.
//!
//! The fingerprint is SHA-256 (lowercase hex) over the file with line endings
//! normalized to LF and trailing whitespace trimmed from every line, so a
//! checkout with CRLF endings still matches.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Fingerprints of the bundled catalogs, keyed by source name.
pub const PINNED_FINGERPRINTS: [(&str, &str); 2] = [
    (
        "gen1",
        "7f3a56f302001c320c412be1ed1e9189164db48d35782b11a7c05581d5529c47",
    ),
    (
        "gen2",
        "279f2d0d06bfa25141f97479dd19560891a8ae7b3e6ac18405c95b7ed955dfda",
    ),
];

/// CRLF and lone CR become LF; trailing whitespace is trimmed per line.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fingerprint of already-decoded catalog text.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hex::encode(hasher.finalize())
}

/// Expected fingerprints: the pinned table with `extra` layered on top.
pub fn expected_fingerprints(extra: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut table: BTreeMap<String, String> = PINNED_FINGERPRINTS
        .iter()
        .map(|(name, hash)| (name.to_string(), hash.to_string()))
        .collect();
    for (name, hash) in extra {
        table.insert(name.clone(), hash.trim().to_ascii_lowercase());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings_and_trailing_space() {
        assert_eq!(normalize("a,b  \r\nc,d\t\re,f\n"), "a,b\nc,d\ne,f\n");
    }

    #[test]
    fn test_fingerprint_ignores_crlf() {
        assert_eq!(
            fingerprint("A,Common\r\nB,Rare\r\n"),
            fingerprint("A,Common\nB,Rare\n")
        );
    }

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            fingerprint("A,Common\nB,Rare\n"),
            "c709d13906417acaa1ad625b83c95b6ea53bcf64c67bb311913235a8fe6bebb0"
        );
    }

    #[test]
    fn test_fingerprint_detects_edits() {
        assert_ne!(fingerprint("A,Common\n"), fingerprint("A,Rare\n"));
    }

    #[test]
    fn test_bundled_catalogs_match_pins() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        for (name, hash) in PINNED_FINGERPRINTS {
            let path = root.join(format!("assets/data/{}_names.txt", name));
            let text = std::fs::read_to_string(&path).unwrap();
            assert_eq!(fingerprint(&text), hash, "{} drifted from its pin", name);
        }
    }

    #[test]
    fn test_extra_fingerprints_override_pins() {
        let mut extra = BTreeMap::new();
        extra.insert("gen1".to_string(), "ABC".to_string());
        extra.insert("custom".to_string(), "def".to_string());

        let table = expected_fingerprints(&extra);
        assert_eq!(table["gen1"], "abc");
        assert_eq!(table["custom"], "def");
        assert_eq!(table["gen2"], PINNED_FINGERPRINTS[1].1);
    }
}
