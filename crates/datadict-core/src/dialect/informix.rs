//! Informix dialect.
//!
//! Its metadata calls report numeric type codes rather than names, so the
//! metatype hook cross-references those before falling back to the shared
//! table. Auto-increment swaps the type to SERIAL.

use crate::config::Config;
use crate::metatype::{self, ColumnHints, MetaType};
use crate::spec::FieldDescriptor;

use super::{Dialect, standard_suffix};

/// Informix rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformixDialect;

/// Numeric type codes reported by Informix system catalogs.
fn code_meta_type(code: &str) -> Option<MetaType> {
    let meta = match code {
        "0" => MetaType::C,
        "2" => MetaType::I,
        "5" => MetaType::N,
        "7" => MetaType::D,
        "10" => MetaType::T,
        "12" => MetaType::X,
        "17" => MetaType::I8,
        "18" | "53" => MetaType::R,
        "45" => MetaType::L,
        "52" => MetaType::I,
        _ => return None,
    };
    Some(meta)
}

impl Dialect for InformixDialect {
    fn name(&self) -> &'static str {
        "informix"
    }

    fn sys_date(&self) -> &'static str {
        "TODAY"
    }

    fn sys_timestamp(&self) -> &'static str {
        "CURRENT"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C => "VARCHAR",
            MetaType::C2 => "NVARCHAR",
            MetaType::X | MetaType::X2 | MetaType::XL => "TEXT",
            MetaType::B => "BLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "DATETIME",
            MetaType::L => "SMALLINT",
            MetaType::I | MetaType::I4 => "INTEGER",
            MetaType::I1 | MetaType::I2 => "SMALLINT",
            MetaType::I8 => "DECIMAL(20)",
            MetaType::F => "FLOAT",
            MetaType::N => "DECIMAL",
            MetaType::R => "SERIAL",
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
        if let Some(meta) = code_meta_type(native) {
            return meta;
        }
        metatype::resolve(native, max_length, hints, config)
    }

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        if field.auto_increment {
            *type_sql = "SERIAL".to_string();
            // SERIAL columns own their values; only constraint text remains.
            let mut suffix = String::new();
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
}
