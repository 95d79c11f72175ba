//! Encounter generation: weighted picks, the shiny roll, and session state.

#![allow(unused_imports)]

pub mod dice;
pub mod engine;
pub mod session;
pub mod types;

pub use dice::*;
pub use engine::*;
pub use session::*;
pub use types::*;
