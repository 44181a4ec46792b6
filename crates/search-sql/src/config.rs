//! Search condition configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SEARCH_SQL_DIALECT` | postgres | SQL dialect (`postgres` or `h2`) |
//! | `SEARCH_SQL_COMPONENT_NAMESPACE` | filterParams | Placeholder namespace of component filters |
//! | `SEARCH_SQL_ASSET_NAMESPACE` | assetFilterParams | Placeholder namespace of asset filters |
//! | `SEARCH_SQL_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use reposearch_sql::{Dialect, SearchSqlConfig};
//!
//! // Create from environment
//! let config = SearchSqlConfig::from_env();
//!
//! // Or create programmatically
//! let config = SearchSqlConfig {
//!     dialect: Dialect::H2,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Dialect;

static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("namespace pattern is valid"));

/// Configuration for compiling search conditions.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "search-sql")]
#[command(about = "Compile repository search expressions to SQL")]
pub struct SearchSqlConfig {
    /// SQL dialect to compile for.
    #[arg(long, env = "SEARCH_SQL_DIALECT", value_enum, default_value = "postgres")]
    pub dialect: Dialect,

    /// Placeholder namespace for component filters.
    #[arg(long, env = "SEARCH_SQL_COMPONENT_NAMESPACE", default_value = "filterParams")]
    pub component_namespace: String,

    /// Placeholder namespace for asset filters.
    #[arg(long, env = "SEARCH_SQL_ASSET_NAMESPACE", default_value = "assetFilterParams")]
    pub asset_namespace: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SEARCH_SQL_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for SearchSqlConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            component_namespace: "filterParams".to_string(),
            asset_namespace: "assetFilterParams".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl SearchSqlConfig {
    /// Creates a new SearchSqlConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (label, namespace) in [
            ("Component namespace", &self.component_namespace),
            ("Asset namespace", &self.asset_namespace),
        ] {
            if namespace.is_empty() {
                errors.push(format!("{} cannot be empty", label));
            } else if !NAMESPACE_PATTERN.is_match(namespace) {
                errors.push(format!(
                    "{} '{}' must be a letter or underscore followed by letters, digits or underscores",
                    label, namespace
                ));
            }
        }

        if self.component_namespace == self.asset_namespace {
            errors.push("Component and asset namespaces must differ".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
