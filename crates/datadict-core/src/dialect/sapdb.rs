//! SAP DB / MaxDB dialect.

use crate::metatype::MetaType;
use crate::spec::FieldDescriptor;

use super::{Dialect, standard_suffix};

/// SAP DB rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SapDbDialect;

impl Dialect for SapDbDialect {
    fn name(&self) -> &'static str {
        "sapdb"
    }

    fn sys_date(&self) -> &'static str {
        "DATE"
    }

    fn sys_timestamp(&self) -> &'static str {
        "TIMESTAMP"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C => "VARCHAR",
            MetaType::XL | MetaType::X | MetaType::B => "LONG",
            MetaType::C2 => "VARCHAR UNICODE",
            MetaType::X2 => "LONG UNICODE",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "TIMESTAMP",
            MetaType::L => "BOOLEAN",
            MetaType::I | MetaType::I4 | MetaType::R => "INTEGER",
            MetaType::I1 => "FIXED(3)",
            MetaType::I2 => "SMALLINT",
            MetaType::I8 => "FIXED(20)",
            MetaType::F => "FLOAT(38)",
            MetaType::N => "FIXED",
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
            let mut suffix = " DEFAULT SERIAL".to_string();
            if field.not_null {
                suffix.push_str(" NOT NULL");
            }
            if let Some(constraint) = &field.constraint {
                suffix.push(' ');
                suffix.push_str(constraint);
            }
            return suffix;
        }
        standard_suffix(field, default_sql)
    }

    fn alter_column_phrase(&self) -> &'static str {
        "MODIFY"
    }

    fn rename_column_sql(
        &self,
        table: &str,
        old: &str,
        new: &str,
        _column_def: Option<&str>,
    ) -> String {
        format!("RENAME COLUMN {table}.{old} TO {new}")
    }
}
