//! Field-spec mini-language: tokenizer, descriptor builder, and the
//! descriptor types shared with the DDL generator.
//!
//! A field spec is a comma-separated list of column statements:
//!
//! ```text
//! id I KEY AUTO, name C(60) NOTNULL, price N(10.2) DEFAULT 0
//! ```
//!
//! or the equivalent structured form with uppercase attribute keys, as
//! produced by schema-description tooling.

pub mod parser;
pub mod tokenizer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metatype::MetaType;

/// A column's declared type: either a portable metatype or a native type
/// string passed through verbatim (`ENUM`, vendor-specific spellings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeSpec {
    /// One of the portable codes.
    Meta(MetaType),
    /// Raw native type text, emitted as-is by every dialect.
    Native(String),
}

impl TypeSpec {
    /// Parses a TYPE token: a metatype code when it is one, native
    /// passthrough otherwise.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        MetaType::from_code(token).map_or_else(|| Self::Native(token.to_string()), Self::Meta)
    }

    /// The portable code, when this is a portable type.
    #[must_use]
    pub fn meta(&self) -> Option<MetaType> {
        match self {
            Self::Meta(m) => Some(*m),
            Self::Native(_) => None,
        }
    }
}

/// A column default, tracked separately from its rendering so dialects can
/// substitute their own system date/timestamp functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultSpec {
    /// A literal value, quoted on output unless it is numeric and the
    /// column is not character-typed.
    Literal(String),
    /// Raw SQL emitted without quoting (`NOQUOTE`).
    Raw(String),
    /// The dialect's system date function (`DEFDATE`).
    SysDate,
    /// The dialect's system timestamp function (`DEFTIMESTAMP`).
    SysTimestamp,
}

/// One column's normalized declaration.
///
/// Built fresh per parse call and immutable afterwards; `size` and
/// `precision` are only meaningful for the `C`, `N` and `X` families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Declared name, possibly still backtick-wrapped. Quote handling is
    /// the generator's job.
    pub name: String,
    /// Portable or native column type.
    pub ty: TypeSpec,
    /// Declared size (characters or digits).
    pub size: Option<u32>,
    /// Declared precision (decimal digits), only with `size`.
    pub precision: Option<u32>,
    /// NOT NULL requested (implied by KEY and AUTO).
    pub not_null: bool,
    /// Column default.
    pub default: Option<DefaultSpec>,
    /// Auto-increment requested.
    pub auto_increment: bool,
    /// The column is part of the table's primary key.
    pub primary_key: bool,
    /// Raw trailing constraint text.
    pub constraint: Option<String>,
    /// UNSIGNED requested (MySQL-family).
    pub unsigned: bool,
    /// Name of the index this column belongs to, when INDEX was declared.
    pub index: Option<String>,
    /// The declared index is UNIQUE.
    pub unique: bool,
    /// Auxiliary attributes (ENUM value list, dialect extras).
    pub options: BTreeMap<String, String>,
}

impl FieldDescriptor {
    /// A bare descriptor with just a name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            size: None,
            precision: None,
            not_null: false,
            default: None,
            auto_increment: false,
            primary_key: false,
            constraint: None,
            unsigned: false,
            index: None,
            unique: false,
            options: BTreeMap::new(),
        }
    }

    /// The name with backtick wrapping removed, as used for map keys and
    /// metadata matching.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        strip_backticks(&self.name)
    }

    /// Case-normalized key for duplicate detection and live-column lookup.
    #[must_use]
    pub fn key(&self) -> String {
        self.bare_name().to_ascii_uppercase()
    }
}

/// Strips a single level of backtick wrapping, if present.
#[must_use]
pub fn strip_backticks(name: &str) -> &str {
    name.strip_prefix('`')
        .and_then(|n| n.strip_suffix('`'))
        .filter(|n| !n.is_empty())
        .unwrap_or(name)
}

/// An index declared inline in a field spec, or built directly by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Index name, unique per table (case-insensitive).
    pub name: String,
    /// Member columns in declaration order.
    pub columns: Vec<String>,
    /// Creation options.
    pub options: IndexOptions,
}

/// Options accepted by index creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// UNIQUE index.
    pub unique: bool,
    /// Drop an existing index of the same name first.
    pub replace: bool,
    /// Only drop; do not create.
    pub drop: bool,
    /// MSSQL CLUSTERED index.
    pub clustered: bool,
    /// MySQL FULLTEXT index.
    pub fulltext: bool,
    /// Oracle BITMAP index.
    pub bitmap: bool,
    /// Raw trailing text keyed by dialect name, appended when that dialect
    /// generates the statement.
    pub dialect_text: BTreeMap<String, String>,
}

/// Table-level options for CREATE TABLE and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Drop any existing table first, then create.
    pub replace: bool,
    /// Only drop; do not create.
    pub drop: bool,
    /// Constraint text appended inside the column list, verbatim.
    pub constraints: Option<String>,
    /// Per-dialect constraint text, applied only by the named dialect.
    pub dialect_constraints: BTreeMap<String, String>,
    /// Per-dialect suffix after the closing paren (`ENGINE=InnoDB` and
    /// similar), applied only by the named dialect.
    pub dialect_suffix: BTreeMap<String, String>,
}

/// The full desired table shape produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Columns in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Primary key column names in declaration order.
    pub primary_key: Vec<String>,
    /// Inline-declared indexes in declaration order.
    pub indexes: Vec<IndexDescriptor>,
}

impl TableSpec {
    /// Looks up a field by its case-normalized key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        let key = key.to_ascii_uppercase();
        self.fields.iter().find(|f| f.key() == key)
    }
}

/// The structured field-definition form: one entry per column with
/// uppercase attribute keys, as consumed from schema-description tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawField {
    /// Column name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Metatype code or native type text.
    #[serde(rename = "TYPE")]
    pub ty: String,
    /// Size, optionally `size.precision`.
    #[serde(rename = "SIZE", default)]
    pub size: Option<String>,
    /// Default value literal.
    #[serde(rename = "DEFAULT", default)]
    pub default: Option<String>,
    /// Emit the default unquoted.
    #[serde(rename = "NOQUOTE", default)]
    pub noquote: bool,
    /// Default to the dialect's system date.
    #[serde(rename = "DEFDATE", default)]
    pub defdate: bool,
    /// Default to the dialect's system timestamp.
    #[serde(rename = "DEFTIMESTAMP", default)]
    pub deftimestamp: bool,
    /// NOT NULL.
    #[serde(rename = "NOTNULL", default)]
    pub notnull: bool,
    /// Primary key member.
    #[serde(rename = "KEY", default)]
    pub key: bool,
    /// Auto-increment.
    #[serde(rename = "AUTOINCREMENT", default)]
    pub autoincrement: bool,
    /// UNSIGNED.
    #[serde(rename = "UNSIGNED", default)]
    pub unsigned: bool,
    /// Raw constraint text.
    #[serde(rename = "CONSTRAINT", default)]
    pub constraint: Option<String>,
    /// Index name; empty string names the index after the column.
    #[serde(rename = "INDEX", default)]
    pub index: Option<String>,
    /// UNIQUE index membership.
    #[serde(rename = "UNIQUE", default)]
    pub unique: bool,
    /// ENUM value list, rendered inside parens after the type.
    #[serde(rename = "ENUM", default)]
    pub enum_values: Option<String>,
}
