//! Shiny journal: per-creature find counts and the error channel.

#![allow(unused_imports)]

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
