//! PostgreSQL condition compiler.
//!
//! Full-text predicates match a `tsvector` column against bound `tsquery`
//! literals with `@@`. Regular expressions use the `~` operator.

use crate::columns::{ColumnDescriptor, ColumnRegistry};
use crate::compiler::{
    compile_expression, CompileState, ConditionCompiler, PredicateRenderer, PreparedPredicate,
};
use crate::error::CompileResult;
use crate::types::{Dialect, Expression, Operand, SqlSearchQueryCondition, Term};

use super::fulltext;

/// PostgreSQL condition compiler.
#[derive(Debug)]
pub struct PostgresConditionCompiler {
    state: CompileState,
}

impl PostgresConditionCompiler {
    /// Creates a compiler writing placeholders in `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            state: CompileState::new(namespace),
        }
    }

    /// Compiles the expression, consuming the compiler.
    pub fn build(mut self, expression: &Expression) -> CompileResult<SqlSearchQueryCondition> {
        let sql = compile_expression(&mut self, expression);
        self.state.finish(sql)
    }

    fn tsquery_match(&mut self, column: &str, queries: Vec<String>) -> String {
        let casts: Vec<String> = queries
            .into_iter()
            .map(|query| format!("{}::tsquery", self.state.add_param(column, query)))
            .collect();

        if casts.len() == 1 {
            format!("{} @@ {}", column, casts[0])
        } else {
            format!("{} @@ ({})", column, casts.join(" || "))
        }
    }
}

impl ConditionCompiler for PostgresConditionCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn namespace(&self) -> &str {
        self.state.namespace()
    }

    fn build(self: Box<Self>, expression: &Expression) -> CompileResult<SqlSearchQueryCondition> {
        PostgresConditionCompiler::build(*self, expression)
    }
}

impl PredicateRenderer for PostgresConditionCompiler {
    const FULLTEXT_STRATEGY: &'static str = "tsquery";

    fn registry(&self) -> &'static ColumnRegistry {
        ColumnRegistry::for_dialect(Dialect::Postgres)
    }

    fn state(&mut self) -> &mut CompileState {
        &mut self.state
    }

    fn regex(&self, column: &str, placeholder: &str) -> String {
        format!("{} ~ {}", column, placeholder)
    }

    // A full-text match column is a tsvector and cannot be regex-matched.
    fn regex_column(&self, descriptor: &ColumnDescriptor) -> Option<&'static str> {
        if descriptor.supports_fulltext {
            descriptor.exact_column
        } else {
            Some(descriptor.match_column)
        }
    }

    // Dotted version-like prefixes tokenize poorly; a LIKE on the plain
    // column is both cheaper and exact.
    fn shortcut(&mut self, predicate: &PreparedPredicate<'_>) -> Option<String> {
        if predicate.descriptor.tokenized {
            return None;
        }
        let exact_column = predicate.descriptor.exact_column?;

        let Some(Term::Wildcard { value, .. }) = predicate.single() else {
            return None;
        };
        if value.matches('.').count() < 2 {
            return None;
        }

        let op = match predicate.operand {
            Operand::NotEq => "NOT LIKE",
            _ => "LIKE",
        };
        let placeholder = self
            .state
            .add_param(exact_column, fulltext::prefix_pattern(value));
        Some(format!("{} {} {}", exact_column, op, placeholder))
    }

    fn match_term(&mut self, predicate: &PreparedPredicate<'_>, term: &Term) -> String {
        let queries = match term {
            Term::Exact { value } => vec![fulltext::exact_query(value)],
            Term::Lenient { value } => fulltext::lenient_queries(value),
            Term::Wildcard {
                value,
                allow_tokenization,
            } => fulltext::wildcard_queries(value, *allow_tokenization),
            Term::Null | Term::Collection { .. } => Vec::new(),
        };
        self.tsquery_match(predicate.descriptor.match_column, queries)
    }
}
