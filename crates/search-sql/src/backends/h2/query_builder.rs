//! H2 condition compiler.
//!
//! Full-text predicates become `LOWER(col) LIKE LOWER(pattern)` and regular
//! expressions use `REGEXP_LIKE`.

use crate::columns::ColumnRegistry;
use crate::compiler::{
    compile_expression, CompileState, ConditionCompiler, PredicateRenderer, PreparedPredicate,
};
use crate::error::CompileResult;
use crate::types::{Dialect, Expression, SqlSearchQueryCondition, Term};

use super::like;

/// H2 condition compiler.
#[derive(Debug)]
pub struct H2ConditionCompiler {
    state: CompileState,
}

impl H2ConditionCompiler {
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
}

impl ConditionCompiler for H2ConditionCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::H2
    }

    fn namespace(&self) -> &str {
        self.state.namespace()
    }

    fn build(self: Box<Self>, expression: &Expression) -> CompileResult<SqlSearchQueryCondition> {
        H2ConditionCompiler::build(*self, expression)
    }
}

impl PredicateRenderer for H2ConditionCompiler {
    const FULLTEXT_STRATEGY: &'static str = "LIKE";

    fn registry(&self) -> &'static ColumnRegistry {
        ColumnRegistry::for_dialect(Dialect::H2)
    }

    fn state(&mut self) -> &mut CompileState {
        &mut self.state
    }

    fn regex(&self, column: &str, placeholder: &str) -> String {
        format!("REGEXP_LIKE({}, {})", column, placeholder)
    }

    fn match_term(&mut self, predicate: &PreparedPredicate<'_>, term: &Term) -> String {
        let column = predicate.descriptor.match_column;
        let pattern = like::like_pattern(term).unwrap_or_default();
        let placeholder = self.state.add_param(column, pattern);
        format!("LOWER({}) LIKE LOWER({})", column, placeholder)
    }
}
