//! Content selector to search expression translation.

use tracing::trace;

use super::aliases::PropertyAliases;
use super::ast::{CselOperator, LogicalOp, SelectorNode};
use crate::error::CselError;
use crate::types::{ClauseOperand, Expression, Operand, SearchField, Term};

/// Matches the start of one element in a stored `["a","b"]` value.
pub const ARRAY_START: &str = r#"(\["|,")"#;

/// Matches the end of one element in a stored `["a","b"]` value.
pub const ARRAY_END: &str = r#"(",|"\])"#;

/// Translates selector trees into search expressions.
///
/// Multi-valued properties such as `path` are stored as a quoted array, so
/// regular expressions are rewritten to match a single element. The dialect
/// only affects how the compiler renders the `REGEX` operand, not the
/// rewritten pattern.
pub struct CselTranslator<'a> {
    aliases: &'a dyn PropertyAliases,
}

impl<'a> CselTranslator<'a> {
    /// Creates a translator using `aliases` to resolve property names.
    pub fn new(aliases: &'a dyn PropertyAliases) -> Self {
        Self { aliases }
    }

    /// Translates a selector tree.
    ///
    /// Unknown properties fail the whole translation.
    pub fn translate(&self, node: &SelectorNode) -> Result<Expression, CselError> {
        match node {
            SelectorNode::Comparison {
                property,
                op,
                value,
            } => self.translate_comparison(property, *op, value),
            SelectorNode::Logical { left, op, right } => {
                let operand = match op {
                    LogicalOp::And => ClauseOperand::And,
                    LogicalOp::Or => ClauseOperand::Or,
                };
                let left = self.translate(left)?;
                let right = self.translate(right)?;
                Ok(Expression::flatten(operand, vec![left, right])?)
            }
            SelectorNode::Group(inner) => self.translate(inner),
        }
    }

    fn translate_comparison(
        &self,
        property: &str,
        op: CselOperator,
        value: &str,
    ) -> Result<Expression, CselError> {
        let field = self.resolve(property)?;
        trace!(property, %field, %op, "translating selector comparison");

        let expression = match op {
            CselOperator::Equal => Expression::predicate(field, Operand::Eq, Term::exact(value)),
            // An absent value counts as "not equal".
            CselOperator::NotEqual => Expression::or(vec![
                Expression::predicate(field, Operand::Eq, Term::Null),
                Expression::predicate(field, Operand::NotEq, Term::exact(value)),
            ])?,
            CselOperator::StartsWith => {
                let prefix = if value.ends_with('*') {
                    value.to_string()
                } else {
                    format!("{}*", value)
                };
                Expression::predicate(field, Operand::Eq, Term::wildcard(prefix, false))
            }
            CselOperator::Matches => {
                Expression::predicate(field, Operand::Regex, Term::exact(rewrite_regex(value)))
            }
        };
        Ok(expression)
    }

    fn resolve(&self, property: &str) -> Result<SearchField, CselError> {
        self.aliases
            .field(property)
            .ok_or_else(|| CselError::UnknownProperty {
                property: property.to_string(),
            })
    }
}

/// Rewrites a selector regex to match one element of a stored array value.
///
/// A leading `^` anchors to the start of an element and, only together with
/// it, a trailing `$` anchors to its end. A trailing `$` on its own is
/// dropped and the pattern is matched anywhere inside an element.
pub fn rewrite_regex(pattern: &str) -> String {
    let (starts, rest) = match pattern.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (ends, body) = match rest.strip_suffix('$') {
        Some(body) if !ends_with_escape(body) => (true, body),
        _ => (false, rest),
    };

    match (starts, ends) {
        (true, true) => format!("{}{}{}", ARRAY_START, body, ARRAY_END),
        (true, false) => format!("{}{}", ARRAY_START, body),
        (false, _) => format!("{}({}){}", ARRAY_START, body, ARRAY_END),
    }
}

/// Returns `true` if the text ends in an unpaired backslash.
fn ends_with_escape(text: &str) -> bool {
    let backslashes = text.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csel::{CselParser, DefaultPropertyAliases};
    use crate::types::SqlClause;

    fn translate(source: &str) -> Result<Expression, CselError> {
        let aliases = DefaultPropertyAliases::new();
        let node = CselParser::parse(source)?;
        CselTranslator::new(&aliases).translate(&node)
    }

    fn clause(expression: &Expression) -> &SqlClause {
        match expression {
            Expression::Clause(clause) => clause,
            _ => panic!("Expected Clause"),
        }
    }

    #[test]
    fn test_rewrite_regex() {
        assert_eq!(rewrite_regex("woof"), r#"(\["|,")(woof)(",|"\])"#);
        assert_eq!(rewrite_regex("^woof$"), r#"(\["|,")woof(",|"\])"#);
        assert_eq!(rewrite_regex("^woof"), r#"(\["|,")woof"#);
        assert_eq!(rewrite_regex("woof$"), r#"(\["|,")(woof)(",|"\])"#);
        assert_eq!(rewrite_regex(r"price\$"), r#"(\["|,")(price\$)(",|"\])"#);
        assert_eq!(rewrite_regex(r"^price\$"), r#"(\["|,")price\$"#);
        assert_eq!(rewrite_regex(r"^dir\\$"), r#"(\["|,")dir\\(",|"\])"#);
        assert_eq!(
            rewrite_regex("^/(a|b)/.*"),
            r#"(\["|,")/(a|b)/.*"#
        );
    }

    #[test]
    fn test_equal() {
        let expr = translate(r#"format == "maven2""#).unwrap();
        assert_eq!(
            expr,
            Expression::predicate(SearchField::Format, Operand::Eq, Term::exact("maven2"))
        );
    }

    #[test]
    fn test_not_equal_includes_null() {
        let expr = translate(r#"coordinate.groupId != "org.x""#).unwrap();
        assert_eq!(
            expr,
            Expression::or(vec![
                Expression::predicate(SearchField::Namespace, Operand::Eq, Term::Null),
                Expression::predicate(SearchField::Namespace, Operand::NotEq, Term::exact("org.x")),
            ])
            .unwrap()
        );
    }

    #[test]
    fn test_starts_with() {
        let expr = translate(r#"coordinate.version =^ "1.2""#).unwrap();
        assert_eq!(
            expr,
            Expression::predicate(
                SearchField::Version,
                Operand::Eq,
                Term::wildcard("1.2*", false)
            )
        );
    }

    #[test]
    fn test_matches_rewrites_pattern() {
        let expr = translate(r#"path =~ "^/org/.*""#).unwrap();
        assert_eq!(
            expr,
            Expression::predicate(
                SearchField::Paths,
                Operand::Regex,
                Term::exact(r#"(\["|,")/org/.*"#)
            )
        );
    }

    #[test]
    fn test_same_operand_is_flattened() {
        let expr = translate("format == 'a' && path =~ '^/x' && coordinate.name == 'n'").unwrap();
        let flat = clause(&expr);
        assert_eq!(flat.operand(), ClauseOperand::And);
        assert_eq!(flat.children().len(), 3);

        let expr = translate("format == 'a' && (path =~ '^/x' && name == 'n')").unwrap();
        assert_eq!(clause(&expr).children().len(), 3);
    }

    #[test]
    fn test_mixed_operands_nest() {
        let expr = translate("format == 'a' && (path =~ '^/x' || path =~ '^/y')").unwrap();
        let outer = clause(&expr);
        assert_eq!(outer.operand(), ClauseOperand::And);
        assert_eq!(outer.children().len(), 2);
        assert_eq!(clause(&outer.children()[1]).operand(), ClauseOperand::Or);
    }

    #[test]
    fn test_unknown_property_is_an_error() {
        match translate("coordinate.color == 'blue'") {
            Err(CselError::UnknownProperty { property }) => {
                assert_eq!(property, "coordinate.color")
            }
            other => panic!("Expected UnknownProperty, got {:?}", other),
        }
    }
}
