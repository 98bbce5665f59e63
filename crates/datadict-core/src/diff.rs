//! Change detection against live column metadata.
//!
//! Compares a desired table shape with the columns a database reports and
//! classifies each desired column as add, alter, or unchanged. The point is
//! to minimize the SQL sent to the engine: strict servers reject re-applied
//! attributes (a second AUTO_INCREMENT, a restated NOT NULL), so anything
//! the live column already satisfies is suppressed rather than re-emitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dialect::Dialect;
use crate::metatype::{ColumnHints, MetaType};
use crate::spec::{DefaultSpec, FieldDescriptor};

/// Metadata describing one existing column, as reported by the database.
///
/// `max_length` and `scale` are `None` (or negative) when the driver does
/// not report them; change detection treats unknown lengths as matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name as reported.
    pub name: String,
    /// Native type name (or numeric type code on Informix).
    pub native_type: String,
    /// Declared length, when reported. `-1` means unbounded.
    pub max_length: Option<i64>,
    /// Decimal scale, when reported.
    pub scale: Option<i64>,
    /// NOT NULL is in effect.
    pub not_null: bool,
    /// A default is attached.
    pub has_default: bool,
    /// The default's value text, when the driver exposes it.
    pub default_value: Option<String>,
    /// The column auto-increments.
    pub auto_increment: bool,
    /// The column is part of the primary key.
    pub primary_key: bool,
    /// Binary flag for blob disambiguation, when the driver reports one.
    pub binary: Option<bool>,
}

impl ColumnMeta {
    /// A minimal record with just a name and native type.
    #[must_use]
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            ..Self::default()
        }
    }
}

/// What to do with one desired column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// The column does not exist live.
    Add,
    /// The column exists but differs; carries a copy of the descriptor with
    /// already-satisfied NOT NULL and AUTOINCREMENT flags cleared.
    Alter(FieldDescriptor),
    /// The column exists and nothing actionable differs.
    Unchanged,
}

/// The computed difference between a desired table shape and live columns.
#[derive(Debug, Clone, Default)]
pub struct TableDiff {
    /// Columns to create, in declaration order.
    pub to_add: Vec<FieldDescriptor>,
    /// Columns to alter (flags already suppressed), in declaration order.
    pub to_alter: Vec<FieldDescriptor>,
    /// Live column names with no desired counterpart. Populated only when
    /// drop-missing is requested.
    pub to_drop: Vec<String>,
}

impl TableDiff {
    /// True when the live table already matches the desired shape.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_alter.is_empty() && self.to_drop.is_empty()
    }
}

/// Finds a live column by name, case-insensitively.
#[must_use]
pub fn find_column<'a>(
    existing: &'a BTreeMap<String, ColumnMeta>,
    name: &str,
) -> Option<&'a ColumnMeta> {
    existing
        .get(name)
        .or_else(|| existing.values().find(|c| c.name.eq_ignore_ascii_case(name)))
}

/// Classifies one desired column against the live table.
#[must_use]
pub fn classify(
    field: &FieldDescriptor,
    existing: &BTreeMap<String, ColumnMeta>,
    dialect: &dyn Dialect,
    config: &Config,
) -> FieldState {
    let Some(live) = find_column(existing, field.bare_name()) else {
        return FieldState::Add;
    };
    if needs_alter(field, live, dialect, config) {
        FieldState::Alter(suppressed(field, live))
    } else {
        FieldState::Unchanged
    }
}

/// Computes the full diff. Desired declaration order is preserved in the
/// add and alter lists; drops are a set difference over all live columns.
#[must_use]
pub fn diff_table(
    desired: &[FieldDescriptor],
    existing: &BTreeMap<String, ColumnMeta>,
    dialect: &dyn Dialect,
    config: &Config,
    drop_missing: bool,
) -> TableDiff {
    let mut diff = TableDiff::default();
    for field in desired {
        match classify(field, existing, dialect, config) {
            FieldState::Add => diff.to_add.push(field.clone()),
            FieldState::Alter(field) => diff.to_alter.push(field),
            FieldState::Unchanged => {}
        }
    }
    if drop_missing {
        for live in existing.values() {
            let wanted = desired
                .iter()
                .any(|f| f.bare_name().eq_ignore_ascii_case(&live.name));
            if !wanted {
                diff.to_drop.push(live.name.clone());
            }
        }
    }
    diff
}

/// The desired metatype adjusted the same way live resolution adjusts:
/// an integer key column counts as R on both sides.
fn desired_meta(field: &FieldDescriptor) -> Option<MetaType> {
    let meta = field.ty.meta()?;
    if field.primary_key && matches!(meta, MetaType::I | MetaType::I4) {
        return Some(MetaType::R);
    }
    Some(meta)
}

fn needs_alter(
    field: &FieldDescriptor,
    live: &ColumnMeta,
    dialect: &dyn Dialect,
    config: &Config,
) -> bool {
    // Native passthrough types cannot be compared; always alter.
    let Some(desired) = desired_meta(field) else {
        return true;
    };
    let hints = ColumnHints {
        primary_key: live.primary_key,
        binary: live.binary,
        datetime_native: false,
    };
    let live_meta = dialect.meta_type(&live.native_type, live.max_length, &hints, config);
    if desired != live_meta {
        return true;
    }
    // Text and blob columns report driver-dependent lengths; skip the size
    // comparison for them, and for drivers that report no length at all.
    if let Some(size) = field.size {
        if !live_meta.is_blob_family() {
            if let Some(len) = live.max_length.filter(|l| *l >= 0) {
                if i64::from(size) != len {
                    return true;
                }
            }
        }
    }
    if let Some(precision) = field.precision {
        match live.scale.filter(|s| *s >= 0) {
            Some(scale) => {
                if i64::from(precision) != scale {
                    return true;
                }
            }
            None => return true,
        }
    }
    if field.auto_increment && !live.auto_increment {
        return true;
    }
    if let Some(default) = &field.default {
        if !live.has_default {
            return true;
        }
        let desired_text = match default {
            DefaultSpec::Literal(v) | DefaultSpec::Raw(v) => v.as_str(),
            DefaultSpec::SysDate => dialect.sys_date(),
            DefaultSpec::SysTimestamp => dialect.sys_timestamp(),
        };
        // A driver that reports a default without its value gives us
        // nothing to compare against, so re-apply the requested one.
        if live.default_value.as_deref() != Some(desired_text) {
            return true;
        }
    }
    false
}

/// Copies the descriptor with flags the live column already satisfies
/// cleared, so the alter line does not re-assert them.
fn suppressed(field: &FieldDescriptor, live: &ColumnMeta) -> FieldDescriptor {
    let mut field = field.clone();
    if live.not_null {
        field.not_null = false;
    }
    if live.auto_increment {
        field.auto_increment = false;
    }
    field
}
