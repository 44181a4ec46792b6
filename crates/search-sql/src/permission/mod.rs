//! Permission and content selector composition.
//!
//! Search results must be limited to what the current principal may see.
//! The [`SqlSearchPermissionBuilder`] turns repository permissions and
//! active content selectors into one [`Expression`](crate::types::Expression)
//! that is compiled alongside the user's own search expression.
//!
//! Repository lookups, permission checks and selector lookups are supplied by
//! the caller through the traits in this module.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SelectorLookupError;

pub mod composer;

pub use composer::{PermissionRequest, RepositoryScope, SqlSearchPermissionBuilder};

/// Actions checked against repository permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// List and search repository content.
    Browse,
    /// Read repository content.
    Read,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Browse => write!(f, "browse"),
            Action::Read => write!(f, "read"),
        }
    }
}

/// A repository known to the repository manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name.
    pub name: String,
    /// Format of the components it stores, e.g. `maven2`.
    pub format: String,
}

impl Repository {
    /// Creates a repository description.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
        }
    }
}

/// The language a content selector is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorType {
    /// Content selector expression language; translatable to SQL.
    Csel,
    /// JEXL; evaluated in memory only and never translated.
    Jexl,
}

/// An active content selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfiguration {
    /// Selector name, used in error messages.
    pub name: String,
    /// Expression language.
    #[serde(rename = "type")]
    pub selector_type: SelectorType,
    /// Expression source text.
    pub expression: String,
}

impl SelectorConfiguration {
    /// Creates a CSEL selector.
    pub fn csel(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector_type: SelectorType::Csel,
            expression: expression.into(),
        }
    }
}

/// Resolves repositories by name.
pub trait RepositoryManager {
    /// Returns the repository called `name`, if it exists.
    fn get(&self, name: &str) -> Option<Repository>;

    /// Returns the names of every repository of `format`.
    fn names_for_format(&self, format: &str) -> Vec<String>;
}

/// Checks the current principal's repository permissions.
pub trait PermissionChecker {
    /// Returns `true` if any of `actions` is permitted on the repository.
    fn any_permitted(&self, repository: &str, format: &str, actions: &[Action]) -> bool;
}

/// Looks up the content selectors that apply to the current principal.
pub trait SelectorManager {
    /// Returns the selectors active for any of `repositories` and `formats`.
    fn active_selectors(
        &self,
        repositories: &[String],
        formats: &[String],
    ) -> Result<Vec<SelectorConfiguration>, SelectorLookupError>;
}
