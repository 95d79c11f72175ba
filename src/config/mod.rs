//! Configuration: defaults, the JSON override file, and path resolution.

#![allow(unused_imports)]

pub mod resolve;
pub mod types;

pub use resolve::*;
pub use types::*;
