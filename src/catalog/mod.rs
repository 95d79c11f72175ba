//! Creature catalogs: fingerprint validation, parsing, and merging.

#![allow(unused_imports)]

pub mod fingerprint;
pub mod store;
pub mod types;

pub use fingerprint::*;
pub use store::*;
pub use types::*;
