//! The shiny journal and the error channel.

use super::types::JournalEntry;
use crate::utils::persistence::{append_line, write_atomic};
use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// On-disk history of shiny finds plus the append-only error log.
///
/// Writes are best effort: failures are reported through the error channel
/// and never undo the in-memory update.
#[derive(Debug)]
pub struct EncounterJournal {
    journal_path: PathBuf,
    error_log_path: PathBuf,
    entries: BTreeMap<String, JournalEntry>,
}

impl EncounterJournal {
    /// Opens the journal, loading any existing entries.
    ///
    /// Malformed lines are reported to the error log and skipped.
    pub fn open(journal_path: impl Into<PathBuf>, error_log_path: impl Into<PathBuf>) -> Self {
        let mut journal = Self {
            journal_path: journal_path.into(),
            error_log_path: error_log_path.into(),
            entries: BTreeMap::new(),
        };
        journal.load_existing();
        journal
    }

    fn load_existing(&mut self) {
        let contents = match fs::read_to_string(&self.journal_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                self.record_error(&format!("Could not read shiny log: {}", e));
                return;
            }
        };

        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            match JournalEntry::parse_line(line) {
                Some(entry) => {
                    self.entries.insert(entry.name.clone(), entry);
                }
                None => self.record_error(&format!("Invalid line in shiny log: {}", line.trim())),
            }
        }
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn error_log_path(&self) -> &Path {
        &self.error_log_path
    }

    pub fn get(&self, name: &str) -> Option<&JournalEntry> {
        self.entries.get(name)
    }

    /// Entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a shiny find and rewrites the journal file.
    ///
    /// The first rarity seen for a name is kept. Returns the updated entry
    /// even when the file could not be written.
    pub fn record_rare(&mut self, name: &str, rarity: &str) -> JournalEntry {
        let entry = self
            .entries
            .entry(name.to_string())
            .and_modify(|e| e.count = e.count.saturating_add(1))
            .or_insert_with(|| JournalEntry {
                name: name.to_string(),
                rarity: rarity.to_string(),
                count: 1,
            })
            .clone();

        if let Err(e) = self.persist() {
            self.record_error(&format!("Error writing to shiny log: {}", e));
        }

        entry
    }

    fn persist(&self) -> io::Result<()> {
        let mut contents = String::new();
        for entry in self.entries.values() {
            contents.push_str(&entry.to_line());
            contents.push('\n');
        }
        write_atomic(&self.journal_path, contents.as_bytes())
    }

    /// Appends a timestamped line to the error log. Never fails.
    pub fn record_error(&self, message: &str) {
        warn!("{}", message);
        let line = format!(
            "{} - ERROR - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            message
        );
        if let Err(e) = append_line(&self.error_log_path, &line) {
            error!(
                path = %self.error_log_path.display(),
                error = %e,
                "Could not append to error log"
            );
        }
    }
}
