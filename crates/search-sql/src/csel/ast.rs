//! Content selector syntax tree.

use std::fmt;

/// Property comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CselOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `=^`, prefix match
    StartsWith,
    /// `=~`, regular expression match
    Matches,
}

impl CselOperator {
    /// Parses an operator token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CselOperator::Equal),
            "!=" => Some(CselOperator::NotEqual),
            "=^" => Some(CselOperator::StartsWith),
            "=~" => Some(CselOperator::Matches),
            _ => None,
        }
    }

    /// Returns the operator token.
    pub fn as_str(&self) -> &'static str {
        match self {
            CselOperator::Equal => "==",
            CselOperator::NotEqual => "!=",
            CselOperator::StartsWith => "=^",
            CselOperator::Matches => "=~",
        }
    }
}

impl fmt::Display for CselOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical operators joining two selector nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&` or `and`
    And,
    /// `||` or `or`
    Or,
}

/// A parsed content selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    /// `property op "value"`
    Comparison {
        /// Property name, e.g. `coordinate.groupId`
        property: String,
        /// Comparison operator
        op: CselOperator,
        /// Literal value
        value: String,
    },
    /// Two nodes joined by `&&` or `||`
    Logical {
        /// Left operand
        left: Box<SelectorNode>,
        /// Logical operator
        op: LogicalOp,
        /// Right operand
        right: Box<SelectorNode>,
    },
    /// A parenthesized node
    Group(Box<SelectorNode>),
}

impl SelectorNode {
    /// Creates a comparison node.
    pub fn comparison(
        property: impl Into<String>,
        op: CselOperator,
        value: impl Into<String>,
    ) -> Self {
        SelectorNode::Comparison {
            property: property.into(),
            op,
            value: value.into(),
        }
    }

    /// Joins two nodes.
    pub fn logical(left: SelectorNode, op: LogicalOp, right: SelectorNode) -> Self {
        SelectorNode::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}
