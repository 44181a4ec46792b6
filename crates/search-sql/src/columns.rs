//! Column registry.
//!
//! Maps each logical [`SearchField`] to the physical column(s) that back it in
//! a given [`Dialect`]. The tables are fixed at startup and shared read-only.
//!
//! The same field may be full-text capable in PostgreSQL (`tsvector` match
//! column plus a plain companion column) and LIKE-matched in H2. Fields that a
//! dialect leaves out are dropped from compiled conditions with a warning.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::{Dialect, SearchField, SortDirection};

/// Physical column description for one (dialect, field) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column matched by full-text/LIKE predicates.
    pub match_column: &'static str,
    /// Plain column for exact comparisons, when distinct from the match column.
    pub exact_column: Option<&'static str>,
    /// Column used for ordering.
    pub sort_column: Option<&'static str>,
    /// The stored value is a delimiter-joined list rather than a scalar.
    pub tokenized: bool,
    /// The column supports the dialect's full-text/LIKE strategy.
    pub supports_fulltext: bool,
}

impl ColumnDescriptor {
    /// A plain scalar column with no full-text support.
    pub const fn plain(column: &'static str) -> Self {
        Self {
            match_column: column,
            exact_column: None,
            sort_column: Some(column),
            tokenized: false,
            supports_fulltext: false,
        }
    }

    /// A full-text column matched through `match_column`.
    pub const fn fulltext(match_column: &'static str) -> Self {
        Self {
            match_column,
            exact_column: None,
            sort_column: None,
            tokenized: false,
            supports_fulltext: true,
        }
    }

    /// Sets the companion exact column.
    pub const fn with_exact(mut self, column: &'static str) -> Self {
        self.exact_column = Some(column);
        self
    }

    /// Sets the sort column.
    pub const fn with_sort(mut self, column: &'static str) -> Self {
        self.sort_column = Some(column);
        self
    }

    /// Marks the column as holding a delimiter-joined list.
    pub const fn tokenized(mut self) -> Self {
        self.tokenized = true;
        self
    }

    /// Returns the column used for exact comparisons.
    pub fn exact_or_match(&self) -> &'static str {
        self.exact_column.unwrap_or(self.match_column)
    }

    /// Returns the column used for ordering, if the field is sortable.
    pub fn order_column(&self) -> Option<&'static str> {
        self.sort_column.or(self.exact_column)
    }
}

/// The column table for one dialect.
#[derive(Debug)]
pub struct ColumnRegistry {
    dialect: Dialect,
    columns: HashMap<SearchField, ColumnDescriptor>,
}

impl ColumnRegistry {
    fn new(dialect: Dialect, entries: &[(SearchField, ColumnDescriptor)]) -> Self {
        Self {
            dialect,
            columns: entries.iter().copied().collect(),
        }
    }

    /// Returns the shared registry for a dialect.
    pub fn for_dialect(dialect: Dialect) -> &'static ColumnRegistry {
        match dialect {
            Dialect::Postgres => &POSTGRES_COLUMNS,
            Dialect::H2 => &H2_COLUMNS,
        }
    }

    /// Returns the dialect this registry describes.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the descriptor for a field, if the dialect maps it.
    pub fn lookup(&self, field: SearchField) -> Option<&ColumnDescriptor> {
        self.columns.get(&field)
    }

    /// Returns the mapped fields, sorted.
    pub fn fields(&self) -> Vec<SearchField> {
        let mut fields: Vec<_> = self.columns.keys().copied().collect();
        fields.sort();
        fields
    }

    /// Builds an ORDER BY clause for a field.
    ///
    /// Returns `None` if the dialect does not map the field or cannot order by it.
    pub fn sort_clause(&self, field: SearchField, direction: SortDirection) -> Option<String> {
        let column = self.lookup(field)?.order_column()?;
        Some(format!("ORDER BY {} {}", column, direction.as_sql()))
    }
}

/// Looks up the descriptor for a (dialect, field) pair.
pub fn lookup(dialect: Dialect, field: SearchField) -> Option<&'static ColumnDescriptor> {
    ColumnRegistry::for_dialect(dialect).lookup(field)
}

static POSTGRES_COLUMNS: Lazy<ColumnRegistry> = Lazy::new(|| {
    use SearchField::*;

    ColumnRegistry::new(
        Dialect::Postgres,
        &[
            (Repository, ColumnDescriptor::plain("repository_name")),
            (Format, ColumnDescriptor::plain("format")),
            (
                Namespace,
                ColumnDescriptor::fulltext("tsvector_namespace")
                    .with_exact("namespace")
                    .with_sort("namespace"),
            ),
            (
                Name,
                ColumnDescriptor::fulltext("tsvector_search_component_name")
                    .with_exact("search_component_name")
                    .with_sort("search_component_name"),
            ),
            (
                Version,
                ColumnDescriptor::fulltext("tsvector_version")
                    .with_exact("version")
                    .with_sort("normalised_version"),
            ),
            (NormalisedVersion, ColumnDescriptor::plain("normalised_version")),
            (ComponentKind, ColumnDescriptor::plain("component_kind")),
            (
                Keywords,
                ColumnDescriptor::fulltext("tsvector_keywords").tokenized(),
            ),
            (
                Paths,
                ColumnDescriptor::fulltext("tsvector_paths")
                    .with_exact("paths")
                    .tokenized(),
            ),
            (Md5, ColumnDescriptor::plain("md5")),
            (Sha1, ColumnDescriptor::plain("sha1")),
            (Sha256, ColumnDescriptor::plain("sha256")),
            (Sha512, ColumnDescriptor::plain("sha512")),
            (
                FormatField1,
                ColumnDescriptor::fulltext("tsvector_format_field_values_1")
                    .with_exact("format_field_values_1"),
            ),
            (
                FormatField2,
                ColumnDescriptor::fulltext("tsvector_format_field_values_2")
                    .with_exact("format_field_values_2"),
            ),
            (
                FormatField3,
                ColumnDescriptor::fulltext("tsvector_format_field_values_3")
                    .with_exact("format_field_values_3"),
            ),
            (
                FormatField4,
                ColumnDescriptor::fulltext("tsvector_format_field_values_4")
                    .with_exact("format_field_values_4"),
            ),
            (
                FormatField5,
                ColumnDescriptor::fulltext("tsvector_format_field_values_5")
                    .with_exact("format_field_values_5"),
            ),
            (
                Uploaders,
                ColumnDescriptor::fulltext("tsvector_uploaders").tokenized(),
            ),
            (
                UploaderIps,
                ColumnDescriptor::fulltext("tsvector_uploader_ips").tokenized(),
            ),
            (Tags, ColumnDescriptor::fulltext("tsvector_tags").tokenized()),
            (LastModified, ColumnDescriptor::plain("last_modified")),
        ],
    )
});

// H2 has no tsvector type: LIKE-capable columns match on the plain column itself.
static H2_COLUMNS: Lazy<ColumnRegistry> = Lazy::new(|| {
    use SearchField::*;

    ColumnRegistry::new(
        Dialect::H2,
        &[
            (Repository, ColumnDescriptor::plain("repository_name")),
            (Format, ColumnDescriptor::plain("format")),
            (
                Namespace,
                ColumnDescriptor::fulltext("namespace").with_sort("namespace"),
            ),
            (
                Name,
                ColumnDescriptor::fulltext("search_component_name")
                    .with_sort("search_component_name"),
            ),
            (
                Version,
                ColumnDescriptor::fulltext("version").with_sort("normalised_version"),
            ),
            (NormalisedVersion, ColumnDescriptor::plain("normalised_version")),
            (ComponentKind, ColumnDescriptor::plain("component_kind")),
            (Keywords, ColumnDescriptor::fulltext("keywords").tokenized()),
            (Paths, ColumnDescriptor::fulltext("paths").tokenized()),
            (Md5, ColumnDescriptor::plain("md5")),
            (Sha1, ColumnDescriptor::plain("sha1")),
            (Sha256, ColumnDescriptor::plain("sha256")),
            (Sha512, ColumnDescriptor::plain("sha512")),
            (
                FormatField1,
                ColumnDescriptor::fulltext("format_field_values_1"),
            ),
            (
                FormatField2,
                ColumnDescriptor::fulltext("format_field_values_2"),
            ),
            (
                FormatField3,
                ColumnDescriptor::fulltext("format_field_values_3"),
            ),
            (
                FormatField4,
                ColumnDescriptor::fulltext("format_field_values_4"),
            ),
            (
                FormatField5,
                ColumnDescriptor::fulltext("format_field_values_5"),
            ),
            (Uploaders, ColumnDescriptor::fulltext("uploaders").tokenized()),
            (Tags, ColumnDescriptor::fulltext("tags").tokenized()),
            (LastModified, ColumnDescriptor::plain("last_modified")),
        ],
    )
});
