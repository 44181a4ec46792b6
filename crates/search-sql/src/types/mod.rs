//! Core types for search expressions and compiled conditions.
//!
//! This module contains the dialect-independent data layer shared by every
//! condition compiler:
//!
//! - [`Term`] - Values a predicate matches against
//! - [`Operand`] - How a predicate compares its column with its term
//! - [`Expression`] - The predicate/clause tree handed to a compiler
//! - [`SearchField`] - Logical search attributes resolved per dialect
//! - [`SqlSearchQueryCondition`] - The SQL text and parameters a compile produces

mod condition;
mod dialect;
mod expression;
mod field;
mod term;

pub use condition::SqlSearchQueryCondition;
pub use dialect::Dialect;
pub use expression::{ClauseOperand, Expression, Operand, SqlClause, SqlPredicate};
pub use field::{SearchField, SortDirection};
pub use term::{Term, TermCollection, TermKind};
