//! Utility modules: build info and file persistence helpers.

#![allow(unused_imports)]

pub mod build_info;
pub mod persistence;

pub use build_info::*;
pub use persistence::*;
