//! Content selector (CSEL) support.
//!
//! Content selectors are administrator-authored boolean expressions over
//! component properties, e.g.
//! `format == "maven2" && path =~ "^/org/apache/.*"`. This module parses them
//! ([`CselParser`]) and translates the result into an [`Expression`]
//! ([`CselTranslator`]) that the condition compilers understand.

pub mod aliases;
pub mod ast;
pub mod parser;
pub mod translator;

pub use aliases::{DefaultPropertyAliases, PropertyAliases};
pub use ast::{CselOperator, LogicalOp, SelectorNode};
pub use parser::{CselParser, CselSelectorParser, SelectorParser};
pub use translator::{rewrite_regex, CselTranslator};

use crate::error::CselError;
use crate::types::Expression;

/// Parses and translates selector source text in one step.
pub fn to_expression(
    source: &str,
    parser: &dyn SelectorParser,
    aliases: &dyn PropertyAliases,
) -> Result<Expression, CselError> {
    let node = parser.parse(source)?;
    CselTranslator::new(aliases).translate(&node)
}
