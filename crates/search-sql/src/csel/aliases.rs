//! Selector property aliases.
//!
//! Selector authors write properties such as `coordinate.groupId` or `path`;
//! these resolve to a [`SearchField`] before translation.

use std::collections::HashMap;

use crate::types::SearchField;

/// Resolves a selector property name to a search field.
pub trait PropertyAliases {
    /// Returns the field for `property`, or `None` if it is unknown.
    fn field(&self, property: &str) -> Option<SearchField>;
}

impl PropertyAliases for HashMap<String, SearchField> {
    fn field(&self, property: &str) -> Option<SearchField> {
        self.get(property).copied()
    }
}

/// The standard property names for component selectors.
#[derive(Debug, Clone)]
pub struct DefaultPropertyAliases {
    aliases: HashMap<String, SearchField>,
}

impl DefaultPropertyAliases {
    /// Creates the standard alias table.
    pub fn new() -> Self {
        use SearchField::*;

        let entries = [
            ("format", Format),
            ("repository", Repository),
            ("path", Paths),
            ("namespace", Namespace),
            ("coordinate.groupId", Namespace),
            ("coordinate.namespace", Namespace),
            ("coordinate.scope", Namespace),
            ("coordinate.vendor", Namespace),
            ("name", Name),
            ("coordinate.artifactId", Name),
            ("coordinate.name", Name),
            ("coordinate.packageId", Name),
            ("coordinate.package", Name),
            ("coordinate.module", Name),
            ("version", Version),
            ("coordinate.version", Version),
            ("md5", Md5),
            ("sha1", Sha1),
            ("sha256", Sha256),
            ("sha512", Sha512),
            ("keywords", Keywords),
            ("tag", Tags),
        ];

        Self {
            aliases: entries
                .into_iter()
                .map(|(name, field)| (name.to_string(), field))
                .collect(),
        }
    }

    /// Adds or replaces an alias.
    pub fn with_alias(mut self, property: impl Into<String>, field: SearchField) -> Self {
        self.aliases.insert(property.into(), field);
        self
    }
}

impl Default for DefaultPropertyAliases {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyAliases for DefaultPropertyAliases {
    fn field(&self, property: &str) -> Option<SearchField> {
        self.aliases.get(property).copied()
    }
}
