//! Compiled search conditions.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\{(?P<namespace>[A-Za-z_][A-Za-z0-9_]*)\.(?P<name>[^}]+)\}")
        .expect("placeholder pattern is valid")
});

/// The output of one compile: a WHERE fragment and its named parameters.
///
/// Placeholders in `sql_text` have the form `#{namespace.name}`; `parameters`
/// is keyed by the bare `name`. Every placeholder has exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SqlSearchQueryCondition {
    /// The SQL predicate text, without a leading `WHERE`.
    pub sql_text: String,
    /// Parameter values keyed by placeholder name.
    pub parameters: BTreeMap<String, String>,
    /// The placeholder namespace used in `sql_text`.
    pub namespace: String,
}

impl SqlSearchQueryCondition {
    /// Creates a condition.
    pub fn new(
        sql_text: impl Into<String>,
        parameters: BTreeMap<String, String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            sql_text: sql_text.into(),
            parameters,
            namespace: namespace.into(),
        }
    }

    /// Returns `true` if the compile produced no predicate at all.
    pub fn is_empty(&self) -> bool {
        self.sql_text.is_empty()
    }

    /// Returns the placeholder names referenced by `sql_text`, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.sql_text)
            .filter_map(|c| c.name("name").map(|m| m.as_str()))
            .collect()
    }

    /// Returns the value bound to a placeholder name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Renders the SQL with parameters inlined as quoted literals.
    ///
    /// Only for logging and debugging; never execute the result.
    pub fn to_inline_sql(&self) -> String {
        PLACEHOLDER
            .replace_all(&self.sql_text, |caps: &regex::Captures<'_>| {
                let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
                match self.parameters.get(name) {
                    Some(value) => format!("'{}'", value.replace('\'', "''")),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
