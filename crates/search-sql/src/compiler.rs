//! Condition compiler.
//!
//! A [`ConditionCompiler`] walks an [`Expression`] and renders it as a SQL
//! WHERE fragment with named parameters. There is one implementation per
//! [`Dialect`]; both share the clause walk and exact-path rendering in this
//! module and differ only in how full-text predicates and regular expressions
//! are written.
//!
//! # Strategy selection
//!
//! Each predicate is rendered on one of two paths:
//!
//! - **Exact**: always for `REGEX`; for `EQ`, `NOT_EQ` and `IN` when the column
//!   has no full-text support, or is full-text but not tokenized and the
//!   predicate is a single exact term.
//! - **Full-text**: everything else. Tokenized columns always land here.
//!
//! # Single use
//!
//! A compiler owns a parameter counter and map that are scoped to exactly one
//! `build` call. `build` consumes the compiler so it cannot be reused.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::backends::{H2ConditionCompiler, PostgresConditionCompiler};
use crate::columns::{ColumnDescriptor, ColumnRegistry};
use crate::error::{CompileError, CompileResult, ValidationIssue};
use crate::types::{
    Dialect, Expression, Operand, SearchField, SqlClause, SqlPredicate, SqlSearchQueryCondition,
    Term, TermKind,
};

/// Compiles one [`Expression`] into a [`SqlSearchQueryCondition`].
pub trait ConditionCompiler {
    /// The dialect this compiler targets.
    fn dialect(&self) -> Dialect;

    /// The placeholder namespace written into the SQL text.
    fn namespace(&self) -> &str;

    /// Compiles the expression, consuming the compiler.
    ///
    /// Unknown columns and blank terms are dropped. Structural problems are
    /// collected across the whole tree and returned as one
    /// [`CompileError::Validation`].
    fn build(self: Box<Self>, expression: &Expression) -> CompileResult<SqlSearchQueryCondition>;
}

/// Creates a fresh compiler for a dialect.
pub fn compiler_for(dialect: Dialect, namespace: impl Into<String>) -> Box<dyn ConditionCompiler> {
    match dialect {
        Dialect::Postgres => Box::new(PostgresConditionCompiler::new(namespace)),
        Dialect::H2 => Box::new(H2ConditionCompiler::new(namespace)),
    }
}

/// Mutable state of a single compile.
#[derive(Debug)]
pub(crate) struct CompileState {
    namespace: String,
    counter: usize,
    parameters: BTreeMap<String, String>,
    issues: Vec<ValidationIssue>,
}

impl CompileState {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            counter: 0,
            parameters: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Binds a value and returns its placeholder.
    ///
    /// Names are the column name with dots removed followed by the counter.
    pub(crate) fn add_param(&mut self, column: &str, value: impl Into<String>) -> String {
        let base = column.replace('.', "");
        let mut name = format!("{}{}", base, self.counter);
        self.counter += 1;
        while self.parameters.contains_key(&name) {
            name = format!("{}{}", base, self.counter);
            self.counter += 1;
        }
        let placeholder = format!("#{{{}.{}}}", self.namespace, name);
        self.parameters.insert(name, value.into());
        placeholder
    }

    pub(crate) fn report(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Ends the compile, failing if any issue was reported.
    pub(crate) fn finish(self, sql: Option<String>) -> CompileResult<SqlSearchQueryCondition> {
        if !self.issues.is_empty() {
            return Err(CompileError::Validation {
                issues: self.issues,
            });
        }
        let sql = sql.unwrap_or_default();
        trace!(namespace = %self.namespace, sql = %sql, "compiled search condition");
        Ok(SqlSearchQueryCondition::new(
            sql,
            self.parameters,
            self.namespace,
        ))
    }
}

/// A predicate whose column is resolved and whose blank terms are removed.
pub(crate) struct PreparedPredicate<'a> {
    pub field: SearchField,
    pub operand: Operand,
    pub descriptor: &'static ColumnDescriptor,
    pub terms: Vec<&'a Term>,
}

impl PreparedPredicate<'_> {
    /// Returns the only term, if there is exactly one.
    pub fn single(&self) -> Option<&Term> {
        match self.terms.as_slice() {
            [term] => Some(*term),
            _ => None,
        }
    }
}

/// Dialect hooks used by [`compile_expression`].
pub(crate) trait PredicateRenderer {
    /// Name of the full-text strategy, used in validation messages.
    const FULLTEXT_STRATEGY: &'static str;

    fn registry(&self) -> &'static ColumnRegistry;

    fn state(&mut self) -> &mut CompileState;

    /// Renders a regular expression match of `column` against a placeholder.
    fn regex(&self, column: &str, placeholder: &str) -> String;

    /// The column a regular expression is matched against, if the field has
    /// one that holds plain text.
    fn regex_column(&self, descriptor: &ColumnDescriptor) -> Option<&'static str> {
        Some(descriptor.exact_or_match())
    }

    /// Renders the whole predicate without per-term matching, when cheaper.
    fn shortcut(&mut self, _predicate: &PreparedPredicate<'_>) -> Option<String> {
        None
    }

    /// Renders a positive full-text match for one non-null term.
    fn match_term(&mut self, predicate: &PreparedPredicate<'_>, term: &Term) -> String;
}

/// Compiles an expression; `None` means it contributes no predicate.
pub(crate) fn compile_expression<R: PredicateRenderer>(
    renderer: &mut R,
    expression: &Expression,
) -> Option<String> {
    match expression {
        Expression::Clause(clause) => compile_clause(renderer, clause),
        Expression::Predicate(predicate) => compile_predicate(renderer, predicate),
    }
}

fn compile_clause<R: PredicateRenderer>(renderer: &mut R, clause: &SqlClause) -> Option<String> {
    if let [only] = clause.children() {
        return compile_expression(renderer, only);
    }

    let parts: Vec<String> = clause
        .children()
        .iter()
        .filter_map(|child| compile_expression(renderer, child))
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(format!("({})", parts.join(clause.operand().joiner())))
}

fn compile_predicate<R: PredicateRenderer>(
    renderer: &mut R,
    predicate: &SqlPredicate,
) -> Option<String> {
    let Some(descriptor) = renderer.registry().lookup(predicate.field) else {
        warn!(
            field = %predicate.field,
            dialect = %renderer.registry().dialect(),
            "No column for search field, dropping predicate"
        );
        return None;
    };

    let members = predicate.term.members();
    let terms: Vec<&Term> = members.into_iter().filter(|t| !t.is_blank()).collect();
    if terms.is_empty() {
        debug!(field = %predicate.field, "Blank search term, dropping predicate");
        return None;
    }

    let prepared = PreparedPredicate {
        field: predicate.field,
        operand: predicate.operand,
        descriptor,
        terms,
    };

    if !prepared.operand.accepts_multiple() && prepared.terms.len() > 1 {
        renderer.state().report(ValidationIssue::Arity {
            field: prepared.field,
            operand: prepared.operand,
            terms: prepared.terms.len(),
        });
        return None;
    }

    if uses_exact_path(&prepared) {
        compile_exact(renderer, &prepared)
    } else {
        compile_fulltext(renderer, &prepared)
    }
}

fn uses_exact_path(predicate: &PreparedPredicate<'_>) -> bool {
    let single_exact = predicate
        .single()
        .map(|t| t.kind() == TermKind::Exact)
        .unwrap_or(false);
    let descriptor = predicate.descriptor;

    match predicate.operand {
        Operand::Regex => true,
        Operand::Eq | Operand::NotEq | Operand::In => {
            !descriptor.supports_fulltext || (!descriptor.tokenized && single_exact)
        }
        Operand::Any => false,
    }
}

fn compile_exact<R: PredicateRenderer>(
    renderer: &mut R,
    predicate: &PreparedPredicate<'_>,
) -> Option<String> {
    let column = predicate.descriptor.exact_or_match();
    let has_null = predicate.terms.iter().any(|t| t.kind() == TermKind::Null);

    match predicate.operand {
        Operand::Eq | Operand::NotEq => {
            let term = predicate.single()?;
            let (null_sql, op) = if predicate.operand == Operand::Eq {
                ("IS NULL", "=")
            } else {
                ("IS NOT NULL", "<>")
            };
            match term.value() {
                None => Some(format!("{} {}", column, null_sql)),
                Some(value) => {
                    let placeholder = renderer.state().add_param(column, value);
                    Some(format!("{} {} {}", column, op, placeholder))
                }
            }
        }
        Operand::Regex => {
            let Some(column) = renderer.regex_column(predicate.descriptor) else {
                renderer.state().report(ValidationIssue::UnsupportedOperand {
                    field: predicate.field,
                    operand: predicate.operand,
                    strategy: "regex",
                });
                return None;
            };
            let value = predicate.single().and_then(Term::value);
            let Some(value) = value else {
                renderer.state().report(ValidationIssue::NullTermNotAllowed {
                    field: predicate.field,
                    operand: predicate.operand,
                });
                return None;
            };
            let placeholder = renderer.state().add_param(column, value);
            Some(renderer.regex(column, &placeholder))
        }
        Operand::In => {
            if has_null {
                renderer.state().report(ValidationIssue::NullTermNotAllowed {
                    field: predicate.field,
                    operand: predicate.operand,
                });
                return None;
            }
            let placeholders: Vec<String> = predicate
                .terms
                .iter()
                .filter_map(|t| t.value())
                .map(|value| renderer.state().add_param(column, value))
                .collect();
            Some(format!("{} IN ({})", column, placeholders.join(", ")))
        }
        Operand::Any => {
            renderer.state().report(ValidationIssue::UnsupportedOperand {
                field: predicate.field,
                operand: predicate.operand,
                strategy: "exact",
            });
            None
        }
    }
}

fn compile_fulltext<R: PredicateRenderer>(
    renderer: &mut R,
    predicate: &PreparedPredicate<'_>,
) -> Option<String> {
    if !predicate.descriptor.supports_fulltext {
        renderer.state().report(ValidationIssue::UnsupportedOperand {
            field: predicate.field,
            operand: predicate.operand,
            strategy: R::FULLTEXT_STRATEGY,
        });
        return None;
    }

    if let Some(sql) = renderer.shortcut(predicate) {
        return Some(sql);
    }

    let negate = predicate.operand == Operand::NotEq;
    let null_column = predicate.descriptor.exact_or_match();

    let matches: Vec<String> = predicate
        .terms
        .iter()
        .map(|term| match term {
            Term::Null if negate => format!("{} IS NOT NULL", null_column),
            Term::Null => format!("{} IS NULL", null_column),
            _ if negate => format!("NOT ({})", renderer.match_term(predicate, term)),
            _ => renderer.match_term(predicate, term),
        })
        .collect();

    match matches.len() {
        0 => None,
        1 => matches.into_iter().next(),
        _ => Some(format!("({})", matches.join(" OR "))),
    }
}
