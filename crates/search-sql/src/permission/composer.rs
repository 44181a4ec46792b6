//! Permission expression composer.
//!
//! Each requested repository contributes in one of three ways:
//!
//! - **Browsable**: the principal has browse or read permission. The name joins
//!   a shared `repository IN (...)` predicate.
//! - **Selector**: one or more CSEL content selectors are active for the
//!   repository. Each is translated and ANDed with `repository = name`.
//!   Selectors apply even to browsable repositories.
//! - **Neither**: nothing.
//!
//! The result ORs every contribution together. If nothing contributes the
//! composer returns [`PermissionError::NoAccess`] rather than an expression
//! that matches nothing.

use tracing::{debug, warn};

use super::{
    Action, PermissionChecker, RepositoryManager, SelectorConfiguration, SelectorManager,
    SelectorType,
};
use crate::csel::{self, CselSelectorParser, PropertyAliases, SelectorParser};
use crate::error::PermissionError;
use crate::types::{ClauseOperand, Expression, Operand, SearchField, Term};

/// Actions that make a repository browsable.
const BROWSE_ACTIONS: [Action; 2] = [Action::Browse, Action::Read];

/// Which repositories a search covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryScope {
    /// Explicitly named repositories; unknown names are an error.
    Named(Vec<String>),
    /// Every repository of the request's format; unknown names are skipped.
    AllForFormat,
}

/// Input to [`SqlSearchPermissionBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    /// Repositories to search.
    pub repositories: RepositoryScope,
    /// Component format.
    pub format: String,
    /// Skip content selectors and filter on browsability only.
    pub authorization_disabled: bool,
}

impl PermissionRequest {
    /// A request over named repositories.
    pub fn named<I, S>(repositories: I, format: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repositories: RepositoryScope::Named(
                repositories.into_iter().map(Into::into).collect(),
            ),
            format: format.into(),
            authorization_disabled: false,
        }
    }

    /// A request over every repository of a format.
    pub fn all_for_format(format: impl Into<String>) -> Self {
        Self {
            repositories: RepositoryScope::AllForFormat,
            format: format.into(),
            authorization_disabled: false,
        }
    }

    /// Disables content selector evaluation.
    pub fn without_authorization(mut self) -> Self {
        self.authorization_disabled = true;
        self
    }
}

/// Builds the permission expression for one search request.
///
/// Construct one per request; it holds no state between calls but borrows
/// the request-scoped collaborators.
pub struct SqlSearchPermissionBuilder<'a> {
    repositories: &'a dyn RepositoryManager,
    permissions: &'a dyn PermissionChecker,
    selectors: &'a dyn SelectorManager,
    aliases: &'a dyn PropertyAliases,
    parser: &'a dyn SelectorParser,
}

impl<'a> SqlSearchPermissionBuilder<'a> {
    /// Creates a builder using the built-in CSEL parser.
    pub fn new(
        repositories: &'a dyn RepositoryManager,
        permissions: &'a dyn PermissionChecker,
        selectors: &'a dyn SelectorManager,
        aliases: &'a dyn PropertyAliases,
    ) -> Self {
        Self {
            repositories,
            permissions,
            selectors,
            aliases,
            parser: &CselSelectorParser,
        }
    }

    /// Replaces the selector parser.
    pub fn with_parser(mut self, parser: &'a dyn SelectorParser) -> Self {
        self.parser = parser;
        self
    }

    /// Composes the permission expression for `request`.
    pub fn build(&self, request: &PermissionRequest) -> Result<Expression, PermissionError> {
        let names = self.resolve_repositories(request)?;
        let format = request.format.as_str();

        // Browsability is checked even when authorization is disabled.
        let browsable: Vec<String> = names
            .iter()
            .filter(|name| {
                self.permissions
                    .any_permitted(name, format, &BROWSE_ACTIONS)
            })
            .cloned()
            .collect();

        let mut parts = Vec::new();
        if !browsable.is_empty() {
            parts.push(Expression::predicate(
                SearchField::Repository,
                Operand::In,
                Term::exact_values(browsable),
            ));
        }

        if !request.authorization_disabled {
            parts.extend(self.selector_expressions(&names, format)?);
        }

        if parts.is_empty() {
            debug!(format, repositories = names.len(), "no browsable repository or selector");
            return Err(PermissionError::NoAccess);
        }
        Ok(Expression::flatten(ClauseOperand::Or, parts)?)
    }

    fn resolve_repositories(
        &self,
        request: &PermissionRequest,
    ) -> Result<Vec<String>, PermissionError> {
        let mut names: Vec<String> = Vec::new();

        match &request.repositories {
            RepositoryScope::Named(requested) => {
                let mut unknown = Vec::new();
                for name in requested {
                    if self.repositories.get(name).is_none() {
                        unknown.push(name.clone());
                    } else if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
                if !unknown.is_empty() {
                    return Err(PermissionError::UnknownRepositories(unknown));
                }
            }
            RepositoryScope::AllForFormat => {
                for name in self.repositories.names_for_format(&request.format) {
                    if self.repositories.get(&name).is_none() {
                        debug!(repository = %name, "skipping unknown repository");
                    } else if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }

        Ok(names)
    }

    /// Translates every active selector, ANDed with its repository.
    ///
    /// A failed selector lookup degrades to browsability-only filtering.
    fn selector_expressions(
        &self,
        names: &[String],
        format: &str,
    ) -> Result<Vec<Expression>, PermissionError> {
        let formats = [format.to_string()];
        let mut expressions = Vec::new();

        for name in names {
            let active = match self
                .selectors
                .active_selectors(std::slice::from_ref(name), &formats)
            {
                Ok(active) => active,
                Err(e) => {
                    warn!(
                        repository = %name,
                        error = %e,
                        "Content selector lookup failed, filtering on repository permissions only"
                    );
                    return Ok(Vec::new());
                }
            };

            for selector in active {
                if let Some(expression) = self.selector_expression(name, &selector)? {
                    expressions.push(expression);
                }
            }
        }

        Ok(expressions)
    }

    fn selector_expression(
        &self,
        repository: &str,
        selector: &SelectorConfiguration,
    ) -> Result<Option<Expression>, PermissionError> {
        if selector.selector_type != SelectorType::Csel {
            debug!(
                selector = %selector.name,
                "skipping content selector that cannot be translated to SQL"
            );
            return Ok(None);
        }

        let translated = csel::to_expression(&selector.expression, self.parser, self.aliases)
            .map_err(|source| PermissionError::Selector {
                selector: selector.name.clone(),
                source,
            })?;

        let scoped = Expression::flatten(
            ClauseOperand::And,
            vec![
                translated,
                Expression::predicate(
                    SearchField::Repository,
                    Operand::Eq,
                    Term::exact(repository),
                ),
            ],
        )?;
        Ok(Some(scoped))
    }
}
