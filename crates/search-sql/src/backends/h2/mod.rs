//! H2 backend.
//!
//! H2 has no full-text column type, so full-text predicates become
//! case-insensitive LIKE patterns over the plain columns.

pub mod like;
pub mod query_builder;

pub use query_builder::H2ConditionCompiler;
