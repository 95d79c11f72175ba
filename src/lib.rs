//! shinyhunt - Idle Shiny Hunting Library
//!
//! The encounter engine and its persistence, exposed for the terminal
//! binary, the simulator, and tests.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod encounter;
pub mod hunt;
pub mod journal;
pub mod progress_store;
pub mod simulator;
pub mod utils;

pub use catalog::{Catalog, CatalogStore};
pub use config::{Config, ConfigResolver, Roots};
pub use encounter::{Dice, EncounterEngine, EncounterError, EncounterEvent, HuntState};
pub use hunt::{HuntEvent, HuntHandle, HuntSetup};
pub use journal::EncounterJournal;
pub use progress_store::ProgressStore;
