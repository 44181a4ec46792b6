//! Dialect backends.

pub mod h2;
pub mod postgres;

pub use h2::H2ConditionCompiler;
pub use postgres::PostgresConditionCompiler;
