//! Logical search fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical, dialect-independent search attribute.
///
/// Each field is resolved to a physical column per dialect by the
/// [`ColumnRegistry`](crate::columns::ColumnRegistry). A dialect may leave a
/// field unmapped, in which case predicates on it are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// Repository name.
    Repository,
    /// Repository format (maven2, npm, ...).
    Format,
    /// Component namespace (group, scope, ...).
    Namespace,
    /// Component name.
    Name,
    /// Component version.
    Version,
    /// Sortable, zero-padded version.
    NormalisedVersion,
    /// Component kind.
    ComponentKind,
    /// Free-text keywords.
    Keywords,
    /// Asset paths.
    Paths,
    /// MD5 checksum.
    Md5,
    /// SHA-1 checksum.
    Sha1,
    /// SHA-256 checksum.
    Sha256,
    /// SHA-512 checksum.
    Sha512,
    /// Format-specific attribute slot 1.
    FormatField1,
    /// Format-specific attribute slot 2.
    FormatField2,
    /// Format-specific attribute slot 3.
    FormatField3,
    /// Format-specific attribute slot 4.
    FormatField4,
    /// Format-specific attribute slot 5.
    FormatField5,
    /// Uploading users.
    Uploaders,
    /// Uploading client addresses.
    UploaderIps,
    /// Tags applied to the component.
    Tags,
    /// Last modification time.
    LastModified,
}

impl SearchField {
    /// Every known field, in declaration order.
    pub const ALL: [SearchField; 22] = [
        SearchField::Repository,
        SearchField::Format,
        SearchField::Namespace,
        SearchField::Name,
        SearchField::Version,
        SearchField::NormalisedVersion,
        SearchField::ComponentKind,
        SearchField::Keywords,
        SearchField::Paths,
        SearchField::Md5,
        SearchField::Sha1,
        SearchField::Sha256,
        SearchField::Sha512,
        SearchField::FormatField1,
        SearchField::FormatField2,
        SearchField::FormatField3,
        SearchField::FormatField4,
        SearchField::FormatField5,
        SearchField::Uploaders,
        SearchField::UploaderIps,
        SearchField::Tags,
        SearchField::LastModified,
    ];

    /// Returns the snake_case field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Repository => "repository",
            SearchField::Format => "format",
            SearchField::Namespace => "namespace",
            SearchField::Name => "name",
            SearchField::Version => "version",
            SearchField::NormalisedVersion => "normalised_version",
            SearchField::ComponentKind => "component_kind",
            SearchField::Keywords => "keywords",
            SearchField::Paths => "paths",
            SearchField::Md5 => "md5",
            SearchField::Sha1 => "sha1",
            SearchField::Sha256 => "sha256",
            SearchField::Sha512 => "sha512",
            SearchField::FormatField1 => "format_field_1",
            SearchField::FormatField2 => "format_field_2",
            SearchField::FormatField3 => "format_field_3",
            SearchField::FormatField4 => "format_field_4",
            SearchField::FormatField5 => "format_field_5",
            SearchField::Uploaders => "uploaders",
            SearchField::UploaderIps => "uploader_ips",
            SearchField::Tags => "tags",
            SearchField::LastModified => "last_modified",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for an ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}
