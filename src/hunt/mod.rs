//! Running a hunt: the encounter task, the elapsed-time ticker, and the
//! handle the presentation layer talks to.

#![allow(unused_imports)]

pub mod runner;
pub mod types;

pub use runner::*;
pub use types::*;
