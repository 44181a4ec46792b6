//! PostgreSQL backend.
//!
//! Compiles search expressions to `tsvector @@ tsquery` matches, with plain
//! column comparisons where an exact match is cheaper.

pub mod fulltext;
pub mod query_builder;

pub use query_builder::PostgresConditionCompiler;
