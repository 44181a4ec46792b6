//! Search expression tree.
//!
//! An [`Expression`] is either a single [`SqlPredicate`] over one field or an
//! [`SqlClause`] joining child expressions with AND/OR. Compilers match on it
//! exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::SearchField;
use super::term::Term;
use crate::error::ExpressionError;

/// How a predicate compares its column with its term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operand {
    /// Equal (or matching, on full-text columns).
    Eq,
    /// Not equal.
    NotEq,
    /// Matches any of several terms.
    Any,
    /// Member of a set of terms.
    In,
    /// Regular expression match.
    Regex,
}

impl Operand {
    /// Returns `true` if the operand accepts more than one term.
    ///
    /// This is not enforced by [`SqlPredicate`]; compilers validate it.
    pub fn accepts_multiple(&self) -> bool {
        matches!(self, Operand::Any | Operand::In)
    }

    /// Returns the operand name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operand::Eq => "EQ",
            Operand::NotEq => "NOT_EQ",
            Operand::Any => "ANY",
            Operand::In => "IN",
            Operand::Regex => "REGEX",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClauseOperand {
    /// All children must match.
    And,
    /// At least one child must match.
    Or,
}

impl ClauseOperand {
    /// Returns the SQL joiner, including surrounding spaces.
    pub fn joiner(&self) -> &'static str {
        match self {
            ClauseOperand::And => " AND ",
            ClauseOperand::Or => " OR ",
        }
    }
}

/// A comparison of one search field against a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlPredicate {
    /// The logical field.
    pub field: SearchField,
    /// The comparison.
    pub operand: Operand,
    /// The value(s) compared against.
    pub term: Term,
}

impl SqlPredicate {
    /// Creates a predicate.
    pub fn new(field: SearchField, operand: Operand, term: Term) -> Self {
        Self {
            field,
            operand,
            term,
        }
    }
}

/// A non-empty list of expressions joined by one logical operator.
///
/// A clause with a single child means the same as that child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawClause")]
pub struct SqlClause {
    operand: ClauseOperand,
    children: Vec<Expression>,
}

#[derive(Deserialize)]
struct RawClause {
    operand: ClauseOperand,
    children: Vec<Expression>,
}

impl TryFrom<RawClause> for SqlClause {
    type Error = ExpressionError;

    fn try_from(raw: RawClause) -> Result<Self, Self::Error> {
        SqlClause::new(raw.operand, raw.children)
    }
}

impl SqlClause {
    /// Creates a clause; fails if `children` is empty.
    pub fn new(operand: ClauseOperand, children: Vec<Expression>) -> Result<Self, ExpressionError> {
        if children.is_empty() {
            return Err(ExpressionError::EmptyClause { operand });
        }
        Ok(Self { operand, children })
    }

    /// Returns the logical operator.
    pub fn operand(&self) -> ClauseOperand {
        self.operand
    }

    /// Returns the children, in order.
    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    /// Consumes the clause, returning its children.
    pub fn into_children(self) -> Vec<Expression> {
        self.children
    }
}

/// A search expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// A single field comparison.
    Predicate(SqlPredicate),
    /// A logical combination of expressions.
    Clause(SqlClause),
}

impl Expression {
    /// Creates a predicate expression.
    pub fn predicate(field: SearchField, operand: Operand, term: Term) -> Self {
        Expression::Predicate(SqlPredicate::new(field, operand, term))
    }

    /// Creates an AND clause.
    pub fn and(children: Vec<Expression>) -> Result<Self, ExpressionError> {
        Ok(Expression::Clause(SqlClause::new(ClauseOperand::And, children)?))
    }

    /// Creates an OR clause.
    pub fn or(children: Vec<Expression>) -> Result<Self, ExpressionError> {
        Ok(Expression::Clause(SqlClause::new(ClauseOperand::Or, children)?))
    }

    /// Joins expressions with `operand`, splicing in the children of any
    /// expression that is already a clause with the same operand.
    ///
    /// A single resulting child is returned as is.
    pub fn flatten(
        operand: ClauseOperand,
        expressions: Vec<Expression>,
    ) -> Result<Self, ExpressionError> {
        let mut children = Vec::with_capacity(expressions.len());
        for expression in expressions {
            match expression {
                Expression::Clause(clause) if clause.operand == operand => {
                    children.extend(clause.children);
                }
                other => children.push(other),
            }
        }
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }
        Ok(Expression::Clause(SqlClause::new(operand, children)?))
    }
}

impl From<SqlPredicate> for Expression {
    fn from(predicate: SqlPredicate) -> Self {
        Expression::Predicate(predicate)
    }
}

impl From<SqlClause> for Expression {
    fn from(clause: SqlClause) -> Self {
        Expression::Clause(clause)
    }
}
