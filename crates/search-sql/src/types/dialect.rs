//! Supported SQL dialects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The database dialect a condition is compiled for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL with native `tsvector`/`tsquery` full-text search.
    #[default]
    Postgres,
    /// H2, emulating full-text matching with `LIKE`.
    H2,
}

impl Dialect {
    /// Returns the lowercase dialect name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::H2 => "h2",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "h2" => Ok(Dialect::H2),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
