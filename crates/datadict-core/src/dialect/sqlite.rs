//! SQLite dialect.
//!
//! Auto-increment requires the column to be the integer primary key, so
//! the suffix claims `PRIMARY KEY AUTOINCREMENT` inline and removes the
//! column from the table-level key clause. ALTER COLUMN has no native
//! support; the rewrite hook returns no statements and logs a warning so
//! callers can detect the no-op.

use crate::diff::ColumnMeta;
use crate::metatype::MetaType;
use crate::spec::FieldDescriptor;

use super::{Dialect, ProcessedLine, RenderedField, TableRef};

/// SQLite rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C | MetaType::C2 => "VARCHAR",
            MetaType::XL | MetaType::X2 => "LONGTEXT",
            MetaType::X => "TEXT",
            MetaType::B => "LONGBLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "DATETIME",
            MetaType::I | MetaType::R | MetaType::I4 => "INTEGER",
            MetaType::L | MetaType::I1 => "TINYINT",
            MetaType::I2 => "SMALLINT",
            MetaType::I8 => "BIGINT",
            MetaType::F => "DOUBLE",
            MetaType::N => "NUMERIC",
        }
        .to_string()
    }

    fn blob_allows_not_null(&self) -> bool {
        true
    }

    fn blob_allows_default(&self) -> bool {
        true
    }

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        _type_sql: &mut String,
        primary_key: &mut Vec<String>,
    ) -> String {
        let inline_key = field.primary_key && field.auto_increment;
        let mut suffix = String::new();
        if field.unsigned && !inline_key {
            suffix.push_str(" UNSIGNED");
        }
        if field.not_null {
            suffix.push_str(" NOT NULL");
        }
        if let Some(default) = default_sql {
            suffix.push_str(" DEFAULT ");
            suffix.push_str(default);
        }
        if inline_key {
            suffix.push_str(" PRIMARY KEY AUTOINCREMENT");
            let name = field.bare_name();
            primary_key.retain(|col| !col.eq_ignore_ascii_case(name));
        }
        if let Some(constraint) = &field.constraint {
            suffix.push(' ');
            suffix.push_str(constraint);
        }
        suffix
    }

    fn add_column_phrase(&self) -> &'static str {
        "ADD COLUMN"
    }

    fn supports_alter_column(&self) -> bool {
        false
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table}")
    }

    fn rename_table_sql(&self, from: &str, to: &str) -> String {
        format!("ALTER TABLE {from} RENAME TO {to}")
    }

    fn drop_index_sql(&self, index: &str, _table: &str) -> String {
        format!("DROP INDEX IF EXISTS {index}")
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        _live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        tracing::warn!(
            table = %table.raw,
            column = %rendered.field.name,
            "ALTER COLUMN is not supported natively by SQLite"
        );
        ProcessedLine::empty()
    }
}
