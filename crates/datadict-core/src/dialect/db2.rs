//! IBM DB2 dialect.
//!
//! Identity columns use `GENERATED ALWAYS AS IDENTITY`, which replaces the
//! whole suffix (the server owns default and nullability). Column alters
//! must read `ALTER COLUMN name SET DATA TYPE type` and may not restate
//! NOT NULL.

use crate::diff::ColumnMeta;
use crate::metatype::MetaType;
use crate::spec::FieldDescriptor;

use super::{Dialect, ProcessedLine, RenderedField, TableRef, standard_suffix};

/// DB2 rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Dialect;

impl Dialect for Db2Dialect {
    fn name(&self) -> &'static str {
        "db2"
    }

    fn sys_date(&self) -> &'static str {
        "CURRENT DATE"
    }

    fn sys_timestamp(&self) -> &'static str {
        "CURRENT TIMESTAMP"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C | MetaType::C2 => "VARCHAR",
            MetaType::XL => "CLOB",
            // Default page size caps row length; 3600 leaves headroom.
            MetaType::X | MetaType::X2 => "VARCHAR(3600)",
            MetaType::B => "BLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "TIMESTAMP",
            MetaType::L | MetaType::I1 | MetaType::I2 => "SMALLINT",
            MetaType::I | MetaType::I4 | MetaType::R => "INTEGER",
            MetaType::I8 => "BIGINT",
            MetaType::F => "DOUBLE",
            MetaType::N => "DECIMAL",
        }
        .to_string()
    }

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        _type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        if field.auto_increment {
            // Identity owns default and nullability.
            return " GENERATED ALWAYS AS IDENTITY".to_string();
        }
        standard_suffix(field, default_sql)
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        _live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        // NOT NULL may not appear in an alter; keep default and constraint.
        let mut suffix = String::new();
        if let Some(default) = &rendered.default_sql {
            suffix.push_str(" DEFAULT ");
            suffix.push_str(default);
        }
        if let Some(constraint) = &rendered.field.constraint {
            suffix.push(' ');
            suffix.push_str(constraint);
        }
        ProcessedLine::statement(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}{suffix}",
            table.sql, rendered.name_sql, rendered.type_sql
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TypeSpec;

    #[test]
    fn identity_suppresses_default_and_not_null() {
        let d = Db2Dialect;
        let mut f = FieldDescriptor::new("id", TypeSpec::Meta(MetaType::I));
        f.auto_increment = true;
        f.not_null = true;
        let mut ty = "INTEGER".to_string();
        let suffix = d.create_suffix(&f, Some("0"), &mut ty, &mut vec![]);
        assert_eq!(suffix, " GENERATED ALWAYS AS IDENTITY");
    }

    #[test]
    fn alter_injects_set_data_type_and_drops_not_null() {
        let d = Db2Dialect;
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
            suffix: " NOT NULL".to_string(),
            default_sql: None,
        };
        let line = d.alter_column(&table, &rendered, None);
        assert_eq!(
            line.main,
            vec!["ALTER TABLE users ALTER COLUMN name SET DATA TYPE VARCHAR(60)"]
        );
    }
}
