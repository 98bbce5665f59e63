//! ANSI-oriented fallback dialect.
//!
//! Used when no vendor-specific module applies. Auto-increment has no
//! portable spelling, so the suffix silently ignores it; the primary key
//! clause still covers the common case.

use crate::metatype::MetaType;

use super::Dialect;

/// Dialect of last resort, close to entry-level ANSI SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C | MetaType::C2 => "VARCHAR",
            MetaType::X | MetaType::X2 | MetaType::XL => "VARCHAR(250)",
            MetaType::B => "BLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "TIMESTAMP",
            MetaType::L => "BIT",
            MetaType::I | MetaType::I4 | MetaType::R => "INTEGER",
            MetaType::I1 | MetaType::I2 => "SMALLINT",
            MetaType::I8 => "BIGINT",
            MetaType::F => "DOUBLE PRECISION",
            MetaType::N => "NUMERIC",
        }
        .to_string()
    }
}
