//! Search terms.
//!
//! A [`Term`] is the value side of a predicate. Terms are immutable and
//! compare structurally.

use serde::{Deserialize, Serialize};

use crate::error::ExpressionError;

/// The concrete kind of a [`Term`], ignoring its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// [`Term::Exact`]
    Exact,
    /// [`Term::Wildcard`]
    Wildcard,
    /// [`Term::Lenient`]
    Lenient,
    /// [`Term::Null`]
    Null,
    /// [`Term::Collection`]
    Collection,
}

/// A value matched by a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    /// Match the value as given.
    Exact {
        /// The value.
        value: String,
    },
    /// Match with `*` wildcards; optionally also split into tokens.
    Wildcard {
        /// The value, possibly containing `*`.
        value: String,
        /// Whether the value may be split on separators for full-text matching.
        allow_tokenization: bool,
    },
    /// Match the exact value or its separator-delimited tokens.
    Lenient {
        /// The value.
        value: String,
    },
    /// Match an absent value.
    Null,
    /// Several terms of the same kind.
    Collection {
        /// The member terms.
        terms: TermCollection,
    },
}

impl Term {
    /// Creates an exact term.
    pub fn exact(value: impl Into<String>) -> Self {
        Term::Exact {
            value: value.into(),
        }
    }

    /// Creates a wildcard term.
    pub fn wildcard(value: impl Into<String>, allow_tokenization: bool) -> Self {
        Term::Wildcard {
            value: value.into(),
            allow_tokenization,
        }
    }

    /// Creates a lenient term.
    pub fn lenient(value: impl Into<String>) -> Self {
        Term::Lenient {
            value: value.into(),
        }
    }

    /// Creates a collection of same-kind terms.
    pub fn collection<I>(terms: I) -> Result<Self, ExpressionError>
    where
        I: IntoIterator<Item = Term>,
    {
        Ok(Term::Collection {
            terms: TermCollection::new(terms)?,
        })
    }

    /// Creates a collection of exact terms.
    pub fn exact_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms = Vec::new();
        for value in values {
            let term = Term::exact(value);
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Term::Collection {
            terms: TermCollection(terms),
        }
    }

    /// Returns the kind of this term.
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Exact { .. } => TermKind::Exact,
            Term::Wildcard { .. } => TermKind::Wildcard,
            Term::Lenient { .. } => TermKind::Lenient,
            Term::Null => TermKind::Null,
            Term::Collection { .. } => TermKind::Collection,
        }
    }

    /// Returns the text of a scalar term, or `None` for null and collection terms.
    pub fn value(&self) -> Option<&str> {
        match self {
            Term::Exact { value } | Term::Wildcard { value, .. } | Term::Lenient { value } => {
                Some(value)
            }
            Term::Null | Term::Collection { .. } => None,
        }
    }

    /// Returns `true` if this is a scalar term whose text is empty or whitespace.
    ///
    /// A wildcard made only of `*` is blank too: it restricts nothing.
    pub fn is_blank(&self) -> bool {
        match self {
            Term::Wildcard { value, .. } => value.chars().all(|c| c == '*' || c.is_whitespace()),
            _ => self.value().map(|v| v.trim().is_empty()).unwrap_or(false),
        }
    }

    /// Flattens this term into its scalar members.
    pub fn members(&self) -> Vec<&Term> {
        match self {
            Term::Collection { terms } => terms.iter().collect(),
            other => vec![other],
        }
    }
}

/// An ordered set of scalar terms that all share one [`TermKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Term>")]
pub struct TermCollection(Vec<Term>);

impl TermCollection {
    /// Builds a collection, dropping duplicates while keeping first-seen order.
    ///
    /// Fails if a member is itself a collection or if members differ in kind.
    pub fn new<I>(terms: I) -> Result<Self, ExpressionError>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut members: Vec<Term> = Vec::new();
        for term in terms {
            if term.kind() == TermKind::Collection {
                return Err(ExpressionError::NestedCollection);
            }
            if let Some(first) = members.first() {
                if first.kind() != term.kind() {
                    return Err(ExpressionError::MixedTermKinds {
                        expected: first.kind(),
                        found: term.kind(),
                    });
                }
            }
            if !members.contains(&term) {
                members.push(term);
            }
        }
        Ok(Self(members))
    }

    /// Iterates over the member terms.
    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.0.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the collection has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Term>> for TermCollection {
    type Error = ExpressionError;

    fn try_from(terms: Vec<Term>) -> Result<Self, Self::Error> {
        TermCollection::new(terms)
    }
}

impl<'a> IntoIterator for &'a TermCollection {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_dedups_in_order() {
        let terms = TermCollection::new(vec![
            Term::exact("b"),
            Term::exact("a"),
            Term::exact("b"),
        ])
        .unwrap();
        let values: Vec<_> = terms.iter().filter_map(Term::value).collect();
        assert_eq!(values, vec!["b", "a"]);
    }

    #[test]
    fn test_collection_rejects_mixed_kinds() {
        let err = TermCollection::new(vec![Term::exact("a"), Term::lenient("b")]).unwrap_err();
        assert!(matches!(err, ExpressionError::MixedTermKinds { .. }));
    }

    #[test]
    fn test_collection_rejects_nesting() {
        let inner = Term::exact_values(["a"]);
        let err = TermCollection::new(vec![inner]).unwrap_err();
        assert!(matches!(err, ExpressionError::NestedCollection));
    }

    #[test]
    fn test_blank_terms() {
        assert!(Term::exact("  ").is_blank());
        assert!(Term::wildcard("", true).is_blank());
        assert!(Term::wildcard("**", false).is_blank());
        assert!(!Term::wildcard("a*", false).is_blank());
        assert!(!Term::Null.is_blank());
        assert!(!Term::lenient("x").is_blank());
    }

    #[test]
    fn test_deserialize_validates_collection() {
        let json = r#"{"kind":"collection","terms":[{"kind":"exact","value":"a"},{"kind":"null"}]}"#;
        assert!(serde_json::from_str::<Term>(json).is_err());

        let json = r#"{"kind":"collection","terms":[{"kind":"exact","value":"a"}]}"#;
        let term: Term = serde_json::from_str(json).unwrap();
        assert_eq!(term, Term::exact_values(["a"]));
    }
}
