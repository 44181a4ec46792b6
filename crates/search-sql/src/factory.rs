//! Search condition factory.
//!
//! Hands out a fresh compiler for every compile, bound to the configured
//! dialect and placeholder namespaces.

use tracing::debug;

use crate::compiler::{compiler_for, ConditionCompiler};
use crate::config::SearchSqlConfig;
use crate::error::{CompileResult, ExpressionError};
use crate::types::{ClauseOperand, Dialect, Expression, SqlSearchQueryCondition};

/// Creates condition compilers for one configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchConditionFactory {
    config: SearchSqlConfig,
}

impl SearchConditionFactory {
    /// Creates a factory.
    pub fn new(config: SearchSqlConfig) -> Self {
        Self { config }
    }

    /// Returns the configured dialect.
    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Returns a new compiler writing placeholders in `namespace`.
    pub fn compiler(&self, namespace: &str) -> Box<dyn ConditionCompiler> {
        compiler_for(self.config.dialect, namespace)
    }

    /// Compiles a component search expression.
    pub fn component_filter(
        &self,
        expression: &Expression,
    ) -> CompileResult<SqlSearchQueryCondition> {
        self.compile(&self.config.component_namespace, expression)
    }

    /// Compiles an asset search expression.
    pub fn asset_filter(&self, expression: &Expression) -> CompileResult<SqlSearchQueryCondition> {
        self.compile(&self.config.asset_namespace, expression)
    }

    fn compile(
        &self,
        namespace: &str,
        expression: &Expression,
    ) -> CompileResult<SqlSearchQueryCondition> {
        let condition = self.compiler(namespace).build(expression)?;
        debug!(
            dialect = %self.config.dialect,
            namespace,
            sql = %condition.sql_text,
            parameters = condition.parameters.len(),
            "compiled search filter"
        );
        Ok(condition)
    }

    /// ANDs a search expression with a permission expression.
    ///
    /// Returns `None` when neither side restricts anything.
    pub fn restrict(
        request: Option<Expression>,
        permission: Option<Expression>,
    ) -> Result<Option<Expression>, ExpressionError> {
        match (request, permission) {
            (Some(request), Some(permission)) => Ok(Some(Expression::flatten(
                ClauseOperand::And,
                vec![request, permission],
            )?)),
            (request, permission) => Ok(request.or(permission)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Operand, SearchField, Term};

    fn format_eq(format: &str) -> Expression {
        Expression::predicate(SearchField::Format, Operand::Eq, Term::exact(format))
    }

    #[test]
    fn test_filters_use_configured_namespaces() {
        let factory = SearchConditionFactory::default();

        let component = factory.component_filter(&format_eq("npm")).unwrap();
        assert_eq!(component.sql_text, "format = #{filterParams.format0}");

        let asset = factory.asset_filter(&format_eq("npm")).unwrap();
        assert_eq!(asset.sql_text, "format = #{assetFilterParams.format0}");
        assert_eq!(asset.namespace, "assetFilterParams");
    }

    #[test]
    fn test_each_compile_starts_fresh() {
        let factory = SearchConditionFactory::default();
        let first = factory.component_filter(&format_eq("a")).unwrap();
        let second = factory.component_filter(&format_eq("b")).unwrap();
        assert_eq!(first.placeholders(), second.placeholders());
    }

    #[test]
    fn test_compiler_matches_dialect() {
        let factory = SearchConditionFactory::new(SearchSqlConfig {
            dialect: Dialect::H2,
            ..Default::default()
        });
        let compiler = factory.compiler("p");
        assert_eq!(compiler.dialect(), Dialect::H2);
        assert_eq!(compiler.namespace(), "p");
    }

    #[test]
    fn test_restrict() {
        assert_eq!(SearchConditionFactory::restrict(None, None).unwrap(), None);
        assert_eq!(
            SearchConditionFactory::restrict(Some(format_eq("a")), None).unwrap(),
            Some(format_eq("a"))
        );

        let both =
            SearchConditionFactory::restrict(Some(format_eq("a")), Some(format_eq("b"))).unwrap();
        assert_eq!(
            both,
            Some(Expression::and(vec![format_eq("a"), format_eq("b")]).unwrap())
        );
    }
}
