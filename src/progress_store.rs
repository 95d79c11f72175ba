//! Lifetime shiny count, persisted between runs.

use crate::utils::persistence::write_atomic;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persists the lifetime shiny count.
///
/// File format: the decimal count, base64 encoded (standard alphabet,
/// padded), no trailing newline. A missing or undecodable file is treated
/// as 0 and rewritten.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    count: u64,
}

impl ProgressStore {
    /// Creates a store for `path`; nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The count as of the last load or save.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Loads the count from disk. Never fails: corrupt or missing state is
    /// reset to 0 and persisted.
    pub fn load(&mut self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match decode_count(&contents) {
                Some(count) => {
                    self.count = count;
                    return count;
                }
                None => warn!(
                    path = %self.path.display(),
                    "Shiny count file is corrupted. Resetting to 0."
                ),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => warn!(
                path = %self.path.display(),
                "Shiny count file is missing. Creating new file."
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Shiny count file is unreadable. Resetting to 0."
            ),
        }

        if let Err(e) = self.save(0) {
            warn!(error = %e, "Could not persist recovered shiny count");
        }
        0
    }

    /// Overwrites the stored count atomically.
    pub fn save(&mut self, count: u64) -> io::Result<()> {
        self.count = count;
        write_atomic(&self.path, encode_count(count).as_bytes())
    }

    /// Bumps the count for a new find and persists it.
    ///
    /// Returns the new count; on a write error the in-memory count still
    /// stands and the error is handed back for logging.
    pub fn record_find(&mut self) -> (u64, io::Result<()>) {
        let next = self.count.saturating_add(1);
        let saved = self.save(next);
        (next, saved)
    }
}

pub fn encode_count(count: u64) -> String {
    STANDARD.encode(count.to_string())
}

pub fn decode_count(encoded: &str) -> Option<u64> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.trim().parse().ok()
}
