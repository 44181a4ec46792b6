//! LIKE pattern rendering.

use crate::types::Term;

/// Escapes LIKE metacharacters. Backslash is escaped first so that the
/// escapes added for `%` and `_` are not doubled.
pub fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Builds the contains-pattern for a term.
///
/// The value is escaped and wrapped in `%...%`. For wildcard terms each `*`
/// becomes `%`; a `*` at either end merges with the wrapping `%`.
pub fn like_pattern(term: &Term) -> Option<String> {
    let body = match term {
        Term::Exact { value } | Term::Lenient { value } => escape_like(value),
        Term::Wildcard { value, .. } => value
            .split('*')
            .filter(|piece| !piece.is_empty())
            .map(escape_like)
            .collect::<Vec<_>>()
            .join("%"),
        Term::Null | Term::Collection { .. } => return None,
    };
    Some(format!("%{}%", body))
}
