//! Error types for search condition compilation.
//!
//! Errors fall into four groups:
//!
//! - [`ExpressionError`] - a model value could not be constructed
//! - [`CompileError`] - every structural problem found while walking one
//!   expression, reported together
//! - [`CselError`] - a content selector could not be parsed or translated
//! - [`PermissionError`] - a permission expression could not be composed
//!
//! Unknown columns and blank terms are not errors; compilers drop those
//! predicates and log them.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::types::{ClauseOperand, Operand, SearchField, TermKind};

/// The top-level error type of this crate.
#[derive(Error, Debug)]
pub enum SearchSqlError {
    /// Model construction errors
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// Aggregated compile errors
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Content selector errors
    #[error(transparent)]
    Csel(#[from] CselError),

    /// Permission composition errors
    #[error(transparent)]
    Permission(#[from] PermissionError),
}

/// Errors raised while constructing expression model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// A clause must have at least one child.
    #[error("{operand:?} clause must have at least one child")]
    EmptyClause { operand: ClauseOperand },

    /// Term collections hold terms of a single kind.
    #[error("term collection mixes {expected:?} and {found:?} terms")]
    MixedTermKinds { expected: TermKind, found: TermKind },

    /// Term collections cannot contain collections.
    #[error("term collections cannot be nested")]
    NestedCollection,
}

/// One structural problem found in a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The operand accepts exactly one term but got several.
    Arity {
        field: SearchField,
        operand: Operand,
        terms: usize,
    },

    /// The operand cannot be rendered by the strategy chosen for the column.
    UnsupportedOperand {
        field: SearchField,
        operand: Operand,
        strategy: &'static str,
    },

    /// The operand cannot be applied to a null term.
    NullTermNotAllowed { field: SearchField, operand: Operand },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Arity {
                field,
                operand,
                terms,
            } => write!(
                f,
                "{} on '{}' accepts a single term but got {}",
                operand, field, terms
            ),
            ValidationIssue::UnsupportedOperand {
                field,
                operand,
                strategy,
            } => write!(
                f,
                "{} on '{}' is not supported by the {} strategy",
                operand, field, strategy
            ),
            ValidationIssue::NullTermNotAllowed { field, operand } => {
                write!(f, "{} on '{}' cannot match a null term", operand, field)
            }
        }
    }
}

/// Errors raised by a condition compiler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Every structural problem found while walking the expression.
    #[error("invalid search expression: {}", join_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },
}

impl CompileError {
    /// Returns the collected issues.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            CompileError::Validation { issues } => issues,
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error raised while parsing content selector text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("selector parse error at position {position}: {message}")]
pub struct CselParseError {
    pub message: String,
    pub position: usize,
}

/// Errors raised while turning a content selector into an expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CselError {
    /// The selector text is malformed.
    #[error(transparent)]
    Parse(#[from] CselParseError),

    /// The selector references a property with no search field.
    #[error("unknown selector property: {property}")]
    UnknownProperty { property: String },

    /// The translated expression was structurally invalid.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Error reported by a selector lookup collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("content selector lookup failed: {message}")]
pub struct SelectorLookupError {
    pub message: String,
}

impl SelectorLookupError {
    /// Creates a lookup error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while composing permission expressions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// Explicitly requested repositories do not exist.
    #[error("unknown repositories: {}", .0.join(", "))]
    UnknownRepositories(Vec<String>),

    /// The principal may see nothing in the requested repositories.
    #[error("no access to the requested repositories")]
    NoAccess,

    /// An active content selector could not be used.
    #[error("content selector '{selector}' is invalid: {source}")]
    Selector {
        selector: String,
        #[source]
        source: CselError,
    },

    /// The composed expression was structurally invalid.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Result type for compiles.
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type for crate-level operations.
pub type SearchSqlResult<T> = Result<T, SearchSqlError>;
