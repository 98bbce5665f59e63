//! PostgreSQL dialect.
//!
//! Auto-increment columns become `SERIAL`, which replaces the whole type
//! and suffix. ALTER COLUMN cannot change type, default, and nullability
//! in one clause, so the rewrite hook splits them into a `TYPE` statement
//! followed by `SET DEFAULT` / `SET NOT NULL` companions.

use crate::diff::ColumnMeta;
use crate::metatype::MetaType;
use crate::spec::FieldDescriptor;

use super::{Dialect, ProcessedLine, RenderedField, TableRef, standard_suffix};

/// PostgreSQL rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C | MetaType::C2 => "VARCHAR",
            MetaType::X | MetaType::X2 | MetaType::XL => "TEXT",
            MetaType::B => "BYTEA",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "TIMESTAMP",
            MetaType::L => "BOOLEAN",
            MetaType::I => "INTEGER",
            MetaType::I1 | MetaType::I2 => "INT2",
            MetaType::I4 => "INT4",
            MetaType::I8 => "INT8",
            MetaType::F => "FLOAT8",
            MetaType::N => "NUMERIC",
            MetaType::R => "SERIAL",
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
        type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        if field.auto_increment {
            // SERIAL implies NOT NULL and owns its default sequence.
            let meta = field.ty.meta();
            *type_sql = if meta == Some(MetaType::I8) {
                "BIGSERIAL".to_string()
            } else {
                "SERIAL".to_string()
            };
            return String::new();
        }
        standard_suffix(field, default_sql)
    }

    fn rename_table_sql(&self, from: &str, to: &str) -> String {
        format!("ALTER TABLE {from} RENAME TO {to}")
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        _live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        let alter = format!("ALTER TABLE {} ALTER COLUMN {}", table.sql, rendered.name_sql);
        let mut line = ProcessedLine::statement(format!("{alter} TYPE {}", rendered.type_sql));
        if let Some(default) = &rendered.default_sql {
            line.post.push(format!("{alter} SET DEFAULT {default}"));
        }
        if rendered.field.not_null {
            line.post.push(format!("{alter} SET NOT NULL"));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TypeSpec;

    #[test]
    fn autoincrement_becomes_serial() {
        let d = PostgresDialect;
        let mut f = FieldDescriptor::new("id", TypeSpec::Meta(MetaType::I));
        f.auto_increment = true;
        f.not_null = true;
        let mut ty = d.actual_type(MetaType::I);
        let suffix = d.create_suffix(&f, None, &mut ty, &mut vec![]);
        assert_eq!(ty, "SERIAL");
        assert_eq!(suffix, "");
    }

    #[test]
    fn wide_autoincrement_becomes_bigserial() {
        let d = PostgresDialect;
        let mut f = FieldDescriptor::new("id", TypeSpec::Meta(MetaType::I8));
        f.auto_increment = true;
        let mut ty = d.actual_type(MetaType::I8);
        d.create_suffix(&f, None, &mut ty, &mut vec![]);
        assert_eq!(ty, "BIGSERIAL");
    }

    #[test]
    fn alter_splits_type_default_and_notnull() {
        let d = PostgresDialect;
        let mut f = FieldDescriptor::new("name", TypeSpec::Meta(MetaType::C));
        f.not_null = true;
        let table = TableRef {
            sql: "users".to_string(),
            raw: "users".to_string(),
        };
        let rendered = RenderedField {
            field: &f,
            name_sql: "name".to_string(),
            type_sql: "VARCHAR(60)".to_string(),
            suffix: " DEFAULT 'x' NOT NULL".to_string(),
            default_sql: Some("'x'".to_string()),
        };
        let line = d.alter_column(&table, &rendered, None);
        assert_eq!(
            line.main,
            vec!["ALTER TABLE users ALTER COLUMN name TYPE VARCHAR(60)"]
        );
        assert_eq!(
            line.post,
            vec![
                "ALTER TABLE users ALTER COLUMN name SET DEFAULT 'x'",
                "ALTER TABLE users ALTER COLUMN name SET NOT NULL",
            ]
        );
    }
}
