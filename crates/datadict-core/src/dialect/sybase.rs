//! Sybase ASE dialect.

use crate::config::Config;
use crate::metatype::{self, ColumnHints, MetaType};
use crate::spec::FieldDescriptor;

use super::Dialect;

/// Sybase rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SybaseDialect;

impl Dialect for SybaseDialect {
    fn name(&self) -> &'static str {
        "sybase"
    }

    fn sys_date(&self) -> &'static str {
        "GETDATE()"
    }

    fn sys_timestamp(&self) -> &'static str {
        "GETDATE()"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C => "VARCHAR",
            MetaType::XL | MetaType::X => "TEXT",
            MetaType::C2 => "NVARCHAR",
            MetaType::X2 => "NTEXT",
            MetaType::B => "IMAGE",
            MetaType::D | MetaType::T | MetaType::TS => "DATETIME",
            MetaType::L => "BIT",
            MetaType::I | MetaType::I4 => "INT",
            MetaType::I1 => "TINYINT",
            MetaType::I2 => "SMALLINT",
            MetaType::I8 => "BIGINT",
            MetaType::F | MetaType::R => "REAL",
            MetaType::N => "NUMERIC",
        }
        .to_string()
    }

    fn meta_type(
        &self,
        native: &str,
        max_length: Option<i64>,
        hints: &ColumnHints,
        config: &Config,
    ) -> MetaType {
        // Reported lengths are unreliable, and the integer widths differ
        // from the shared table.
        match native.to_ascii_uppercase().as_str() {
            "INT" | "INTEGER" => MetaType::I,
            "BIT" | "TINYINT" => MetaType::I1,
            "SMALLINT" => MetaType::I2,
            "BIGINT" => MetaType::I8,
            "REAL" | "FLOAT" => MetaType::F,
            _ => metatype::resolve(native, max_length, hints, config),
        }
    }

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        _type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        let mut suffix = String::new();
        if let Some(default) = default_sql {
            suffix.push_str(" DEFAULT ");
            suffix.push_str(default);
        }
        if field.auto_increment {
            suffix.push_str(" DEFAULT AUTOINCREMENT");
        }
        if field.not_null {
            suffix.push_str(" NOT NULL");
        } else if suffix.is_empty() {
            suffix.push_str(" NULL");
        }
        if let Some(constraint) = &field.constraint {
            suffix.push(' ');
            suffix.push_str(constraint);
        }
        suffix
    }

    fn alter_column_phrase(&self) -> &'static str {
        "MODIFY"
    }

    fn one_statement_per_column(&self) -> bool {
        false
    }

    fn drop_index_sql(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {table}.{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TypeSpec;

    #[test]
    fn autoincrement_is_a_default_clause() {
        let d = SybaseDialect;
        let mut f = FieldDescriptor::new("id", TypeSpec::Meta(MetaType::I));
        f.auto_increment = true;
        f.not_null = true;
        let mut ty = "INT".to_string();
        let suffix = d.create_suffix(&f, None, &mut ty, &mut vec![]);
        assert_eq!(suffix, " DEFAULT AUTOINCREMENT NOT NULL");
    }

    #[test]
    fn integer_widths_override_shared_table() {
        let d = SybaseDialect;
        let cfg = Config::default();
        let hints = ColumnHints::default();
        assert_eq!(d.meta_type("BIGINT", None, &hints, &cfg), MetaType::I8);
        assert_eq!(d.meta_type("REAL", None, &hints, &cfg), MetaType::F);
        assert_eq!(d.meta_type("BIT", None, &hints, &cfg), MetaType::I1);
    }

    #[test]
    fn drop_index_is_table_qualified() {
        let d = SybaseDialect;
        assert_eq!(d.drop_index_sql("ix_a", "t"), "DROP INDEX t.ix_a");
    }
}
