//! Encounter data types.

use std::fmt;
use thiserror::Error;

/// Where a hunting session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HuntState {
    #[default]
    Idle,
    Running,
    /// A shiny was found; waiting for the operator to continue
    RareFound,
}

impl fmt::Display for HuntState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HuntState::Idle => "idle",
            HuntState::Running => "running",
            HuntState::RareFound => "stopped on a rare find",
        };
        f.write_str(name)
    }
}

/// Outcome of the two-stage rare roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RareRoll {
    pub rare: bool,
    /// Only ever set when `rare` is false
    pub hinted: bool,
}

/// One encounter produced by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterEvent {
    pub name: String,
    pub rarity: String,
    pub rare: bool,
    pub hinted: bool,
    /// 1-based position within the current session
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("no creatures available: every catalog source failed validation")]
    EmptyCatalog,
    #[error("no catalog entry has a positive encounter weight")]
    NoSelectableEntries,
    #[error("cannot {action} while the hunt is {state}")]
    InvalidTransition {
        action: &'static str,
        state: HuntState,
    },
}
