//! In-memory collaborators for permission composition tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use reposearch_sql::error::SelectorLookupError;
use reposearch_sql::permission::{
    Action, PermissionChecker, Repository, RepositoryManager, SelectorConfiguration,
    SelectorManager,
};

/// Repository manager over a fixed list of repositories.
#[derive(Debug, Default)]
pub struct InMemoryRepositories {
    repositories: Vec<Repository>,
    /// Names reported for a format that `get` does not know.
    phantom: Vec<String>,
}

impl InMemoryRepositories {
    /// Creates a manager holding `names`, all of `format`.
    pub fn of_format(format: &str, names: &[&str]) -> Self {
        Self {
            repositories: names.iter().map(|n| Repository::new(*n, format)).collect(),
            phantom: Vec::new(),
        }
    }

    /// Adds a name that `names_for_format` reports but `get` cannot resolve.
    pub fn with_phantom(mut self, name: &str) -> Self {
        self.phantom.push(name.to_string());
        self
    }
}

impl RepositoryManager for InMemoryRepositories {
    fn get(&self, name: &str) -> Option<Repository> {
        self.repositories.iter().find(|r| r.name == name).cloned()
    }

    fn names_for_format(&self, format: &str) -> Vec<String> {
        self.repositories
            .iter()
            .filter(|r| r.format == format)
            .map(|r| r.name.clone())
            .chain(self.phantom.iter().cloned())
            .collect()
    }
}

/// Permission checker granting browse on a fixed set of repositories.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    browsable: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl StaticPermissions {
    /// Grants browse on `names`.
    pub fn browsable(names: &[&str]) -> Self {
        Self {
            browsable: names.iter().map(|n| n.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Grants nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Repositories checked so far, in call order.
    pub fn checked(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PermissionChecker for StaticPermissions {
    fn any_permitted(&self, repository: &str, _format: &str, actions: &[Action]) -> bool {
        self.calls.borrow_mut().push(repository.to_string());
        actions.contains(&Action::Browse) && self.browsable.contains(repository)
    }
}

/// Selector manager returning fixed selectors per repository.
#[derive(Debug, Default)]
pub struct StaticSelectors {
    selectors: HashMap<String, Vec<SelectorConfiguration>>,
    fail: bool,
    lookups: RefCell<usize>,
}

impl StaticSelectors {
    /// No active selectors.
    pub fn none() -> Self {
        Self::default()
    }

    /// A lookup that always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Adds an active selector for `repository`.
    pub fn with(mut self, repository: &str, selector: SelectorConfiguration) -> Self {
        self.selectors
            .entry(repository.to_string())
            .or_default()
            .push(selector);
        self
    }

    /// Number of lookups performed.
    pub fn lookups(&self) -> usize {
        *self.lookups.borrow()
    }
}

impl SelectorManager for StaticSelectors {
    fn active_selectors(
        &self,
        repositories: &[String],
        _formats: &[String],
    ) -> Result<Vec<SelectorConfiguration>, SelectorLookupError> {
        *self.lookups.borrow_mut() += 1;
        if self.fail {
            return Err(SelectorLookupError::new("selector store unavailable"));
        }
        Ok(repositories
            .iter()
            .filter_map(|r| self.selectors.get(r))
            .flatten()
            .cloned()
            .collect())
    }
}
