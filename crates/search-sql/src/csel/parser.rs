//! Content selector expression parser.
//!
//! # Grammar
//!
//! ```text
//! selector   = orExp
//! orExp      = andExp (("||" / "or") andExp)*
//! andExp     = primary (("&&" / "and") primary)*
//! primary    = "(" selector ")" / comparison
//! comparison = property op value
//! op         = "==" / "!=" / "=^" / "=~"
//! value      = '"' chars '"' / "'" chars "'"
//! property   = identifier ("." identifier)*
//! ```
//!
//! # Example
//!
//! ```ignore
//! format == "maven2" && coordinate.groupId =^ "org.apache"
//! (path =~ "^/org/.*" || path =~ "^/com/.*") and format == 'maven2'
//! ```

use super::ast::{CselOperator, LogicalOp, SelectorNode};
use crate::error::CselParseError;

/// Parses selector source text into a [`SelectorNode`].
///
/// Lets the permission composer be given a parser other than [`CselParser`].
pub trait SelectorParser {
    /// Parses one selector expression.
    fn parse(&self, source: &str) -> Result<SelectorNode, CselParseError>;
}

/// The built-in [`SelectorParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CselSelectorParser;

impl SelectorParser for CselSelectorParser {
    fn parse(&self, source: &str) -> Result<SelectorNode, CselParseError> {
        CselParser::parse(source)
    }
}

/// Recursive-descent parser for content selector expressions.
pub struct CselParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> CselParser<'a> {
    /// Creates a new parser.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parses the entire selector expression.
    pub fn parse(input: &str) -> Result<SelectorNode, CselParseError> {
        let mut parser = CselParser::new(input);
        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Err(parser.error("Empty selector expression"));
        }
        let node = parser.parse_or_expr()?;
        parser.skip_whitespace();
        if parser.pos < parser.input.len() {
            return Err(parser.error(format!(
                "Unexpected characters after expression: '{}'",
                &parser.input[parser.pos..]
            )));
        }
        Ok(node)
    }

    fn error(&self, message: impl Into<String>) -> CselParseError {
        CselParseError {
            message: message.into(),
            position: self.pos,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    /// Consumes a logical keyword or symbol if one is next.
    fn eat_logical(&mut self, symbol: &str, word: &str) -> bool {
        if self.rest().starts_with(symbol) {
            self.pos += symbol.len();
            return true;
        }
        let matches_word = self
            .rest()
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word));
        if matches_word && self.is_word_boundary(word.len()) {
            self.pos += word.len();
            return true;
        }
        false
    }

    fn is_word_boundary(&self, offset: usize) -> bool {
        match self.input[self.pos + offset..].chars().next() {
            Some(c) => !c.is_alphanumeric() && c != '_',
            None => true,
        }
    }

    /// Parses an OR expression (lowest precedence).
    fn parse_or_expr(&mut self) -> Result<SelectorNode, CselParseError> {
        let mut left = self.parse_and_expr()?;

        loop {
            self.skip_whitespace();
            if !self.eat_logical("||", "or") {
                break;
            }
            let right = self.parse_and_expr()?;
            left = SelectorNode::logical(left, LogicalOp::Or, right);
        }

        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<SelectorNode, CselParseError> {
        let mut left = self.parse_primary()?;

        loop {
            self.skip_whitespace();
            if !self.eat_logical("&&", "and") {
                break;
            }
            let right = self.parse_primary()?;
            left = SelectorNode::logical(left, LogicalOp::And, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<SelectorNode, CselParseError> {
        self.skip_whitespace();

        if self.peek() == Some('(') {
            self.consume();
            let node = self.parse_or_expr()?;
            self.skip_whitespace();
            if self.peek() != Some(')') {
                return Err(self.error("Expected closing parenthesis"));
            }
            self.consume();
            Ok(SelectorNode::Group(Box::new(node)))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<SelectorNode, CselParseError> {
        let property = self.parse_property()?;
        self.skip_whitespace();
        let op = self.parse_operator()?;
        self.skip_whitespace();
        let value = self.parse_value()?;
        Ok(SelectorNode::Comparison {
            property,
            op,
            value,
        })
    }

    fn parse_property(&mut self) -> Result<String, CselParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' {
                self.consume();
            } else {
                break;
            }
        }

        let property = &self.input[start..self.pos];
        if property.is_empty() {
            return Err(self.error("Expected property name"));
        }
        if property.starts_with('.') || property.ends_with('.') || property.contains("..") {
            return Err(CselParseError {
                message: format!("Malformed property name: '{}'", property),
                position: start,
            });
        }
        Ok(property.to_string())
    }

    fn parse_operator(&mut self) -> Result<CselOperator, CselParseError> {
        let start = self.pos;
        let token: String = self.rest().chars().take(2).collect();

        match CselOperator::parse(&token) {
            Some(op) => {
                self.pos += token.len();
                Ok(op)
            }
            None => Err(CselParseError {
                message: format!("Unknown operator: '{}'", token),
                position: start,
            }),
        }
    }

    fn parse_value(&mut self) -> Result<String, CselParseError> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("Expected quoted string value")),
        };
        self.consume();

        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == quote => break,
                Some('\\') => match self.consume() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c @ ('"' | '\'')) => value.push(c),
                    // Regex escapes such as `\.` or `\\` pass through untouched.
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return Err(self.error("Unterminated string")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("Unterminated string")),
            }
        }

        Ok(value)
    }
}
