//! Repository Search SQL
//!
//! This crate compiles component search expressions into parameterized SQL
//! WHERE fragments. It is a pure in-process transform: it produces SQL text
//! and named parameters and leaves execution to the caller.
//!
//! # Features
//!
//! - **Two dialects**: PostgreSQL with native `tsvector`/`tsquery` full-text
//!   search, and H2 with LIKE-based emulation
//! - **Aggregated validation**: every arity or operand problem in an
//!   expression is reported at once
//! - **Content selectors**: CSEL expressions are parsed and translated into
//!   search expressions
//! - **Permission composition**: repository permissions and content
//!   selectors become one search restriction
//!
//! # Architecture
//!
//! - [`types`] - Expression model, terms, fields and compiled conditions
//! - [`columns`] - Per-dialect column registry
//! - [`compiler`] - The [`ConditionCompiler`] trait and shared compile walk
//! - [`backends`] - PostgreSQL and H2 compilers
//! - [`csel`] - Content selector parser and translator
//! - [`permission`] - Permission and content selector composer
//! - [`config`] / [`factory`] - Configuration and compiler factory
//!
//! # Example
//!
//! ```rust
//! use reposearch_sql::{Expression, Operand, SearchConditionFactory, SearchField, Term};
//!
//! let expression = Expression::and(vec![
//!     Expression::predicate(SearchField::Format, Operand::Eq, Term::exact("maven2")),
//!     Expression::predicate(SearchField::Name, Operand::Eq, Term::wildcard("guav*", false)),
//! ])
//! .unwrap();
//!
//! let condition = SearchConditionFactory::default()
//!     .component_filter(&expression)
//!     .unwrap();
//! assert_eq!(
//!     condition.sql_text,
//!     "(format = #{filterParams.format0} AND \
//!      tsvector_search_component_name @@ #{filterParams.tsvector_search_component_name1}::tsquery)"
//! );
//! assert_eq!(condition.parameter("tsvector_search_component_name1"), Some("'guav':*"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod columns;
pub mod compiler;
pub mod config;
pub mod csel;
pub mod error;
pub mod factory;
pub mod permission;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    CompileError, CompileResult, CselError, ExpressionError, PermissionError, SearchSqlError,
    SearchSqlResult, ValidationIssue,
};
pub use types::{
    ClauseOperand, Dialect, Expression, Operand, SearchField, SortDirection, SqlClause,
    SqlPredicate, SqlSearchQueryCondition, Term, TermCollection, TermKind,
};

pub use backends::{H2ConditionCompiler, PostgresConditionCompiler};
pub use columns::{ColumnDescriptor, ColumnRegistry};
pub use compiler::{compiler_for, ConditionCompiler};
pub use config::SearchSqlConfig;
pub use factory::SearchConditionFactory;
pub use permission::{
    Action, PermissionChecker, PermissionRequest, Repository, RepositoryManager, RepositoryScope,
    SelectorConfiguration, SelectorManager, SelectorType, SqlSearchPermissionBuilder,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
