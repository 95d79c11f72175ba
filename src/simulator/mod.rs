//! Headless Monte Carlo runs of the encounter engine.
//!
//! Steps the same [`EncounterEngine`](crate::encounter::EncounterEngine) the
//! live hunt uses, without sleeping or touching the stores, and reports how
//! often shinies, hints and each rarity came up.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::run_simulation;
