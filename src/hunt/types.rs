//! Messages between the hunt tasks and the presentation layer.

use crate::encounter::{EncounterError, EncounterEvent};
use crate::journal::JournalEntry;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Something the presentation layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum HuntEvent {
    /// The encounter loop is running
    Started { total_finds: u64, catalog_size: usize },
    /// An ordinary encounter; `hinted` asks for a "shiny nearby" notice
    Encounter(EncounterEvent),
    /// A shiny. The loop is paused until a continue command arrives.
    RareFound {
        event: EncounterEvent,
        /// Lifetime finds including this one
        total_finds: u64,
        /// Journal record for this creature after the update
        entry: JournalEntry,
    },
    /// Hunting resumed after a rare find; session counters were reset
    Resumed,
    /// Hunting time since the session started or last resumed
    Elapsed(Duration),
    /// The encounter loop has exited
    Stopped,
}

/// Operator input for the encounter loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntCommand {
    Continue,
    Shutdown,
}

#[derive(Debug, Error)]
pub enum HuntError {
    #[error(transparent)]
    Encounter(#[from] EncounterError),
    #[error("hunt storage error: {0}")]
    Io(#[from] io::Error),
    #[error("the hunt is no longer running")]
    Closed,
    #[error("hunt task failed: {0}")]
    TaskFailed(String),
}
