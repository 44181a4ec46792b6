//! Test infrastructure for the search SQL compiler.
//!
//! In-memory collaborators for the permission composer and assertion helpers
//! for compiled conditions.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
