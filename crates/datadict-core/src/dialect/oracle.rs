//! Oracle dialect.
//!
//! Auto-increment is emulated: a `SEQ_<table>` sequence plus a before-insert
//! trigger filling the column when it arrives NULL or zero. Dropping a
//! REPLACEd table also drops its sequence.

use crate::config::Config;
use crate::diff::ColumnMeta;
use crate::metatype::{self, ColumnHints, MetaType};
use crate::spec::FieldDescriptor;

use super::{Dialect, ProcessedLine, RenderedField, TableRef, standard_suffix};

/// Longest identifier older Oracle servers accept.
const MAX_IDENTIFIER: usize = 30;

/// Oracle rules (oci8 driver family).
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl OracleDialect {
    fn sequence_name(table: &str) -> String {
        clip_identifier(&format!("SEQ_{table}"))
    }

    fn trigger_name(table: &str) -> String {
        clip_identifier(&format!("TRIG_SEQ_{table}"))
    }
}

fn clip_identifier(name: &str) -> String {
    name.chars().take(MAX_IDENTIFIER).collect()
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn sys_date(&self) -> &'static str {
        "TRUNC(SYSDATE)"
    }

    fn sys_timestamp(&self) -> &'static str {
        "SYSTIMESTAMP"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C => "VARCHAR",
            MetaType::X => "VARCHAR(4000)",
            MetaType::XL => "CLOB",
            MetaType::C2 => "NVARCHAR2",
            MetaType::X2 => "NVARCHAR2(4000)",
            MetaType::B => "BLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "TIMESTAMP",
            MetaType::L => "DECIMAL(1)",
            MetaType::I1 => "DECIMAL(3)",
            MetaType::I2 => "DECIMAL(5)",
            MetaType::I | MetaType::I4 | MetaType::R => "DECIMAL(10)",
            MetaType::I8 => "DECIMAL(20)",
            MetaType::F | MetaType::N => "DECIMAL",
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
        // LONG is numeric elsewhere but a blob here.
        if native.eq_ignore_ascii_case("LONG") {
            return MetaType::B;
        }
        metatype::resolve(native, max_length, hints, config)
    }

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        _type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        // Auto-increment is the trigger hook's job; the column itself only
        // carries the standard suffix.
        standard_suffix(field, default_sql)
    }

    fn alter_column_phrase(&self) -> &'static str {
        "MODIFY"
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        _live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        ProcessedLine::statement(format!(
            "ALTER TABLE {} MODIFY {} {}{}",
            table.sql, rendered.name_sql, rendered.type_sql, rendered.suffix
        ))
    }

    fn index_sql(
        &self,
        index: &str,
        table: &str,
        columns: &[String],
        options: &crate::spec::IndexOptions,
    ) -> Vec<String> {
        let mut sql = Vec::new();
        if options.drop || options.replace {
            sql.push(self.drop_index_sql(index, table));
            if options.drop {
                return sql;
            }
        }
        if columns.is_empty() {
            return sql;
        }
        // BITMAP occupies the UNIQUE position.
        let modifier = if options.bitmap {
            " BITMAP"
        } else if options.unique {
            " UNIQUE"
        } else {
            ""
        };
        let mut stmt = format!(
            "CREATE{modifier} INDEX {index} ON {table} ({})",
            columns.join(", ")
        );
        if let Some(extra) = options.dialect_text.get(self.name()) {
            stmt.push(' ');
            stmt.push_str(extra);
        }
        sql.push(stmt);
        sql
    }

    fn triggers(&self, table: &TableRef, auto_field: &str, replace: bool) -> Vec<String> {
        let seq = Self::sequence_name(&table.raw);
        let trig = Self::trigger_name(&table.raw);
        let mut sql = Vec::new();
        if replace {
            sql.push(format!("DROP SEQUENCE {seq}"));
        }
        sql.push(format!("CREATE SEQUENCE {seq}"));
        sql.push(format!(
            "CREATE OR REPLACE TRIGGER {trig} BEFORE INSERT ON {} FOR EACH ROW WHEN \
             (NEW.{auto_field} IS NULL OR NEW.{auto_field} = 0) BEGIN SELECT {seq}.nextval \
             INTO :new.{auto_field} FROM dual; END;",
            table.sql
        ));
        sql
    }

    fn drop_auto_increment(&self, table: &TableRef) -> Option<String> {
        Some(format!("DROP SEQUENCE {}", Self::sequence_name(&table.raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_is_a_blob_here() {
        let d = OracleDialect;
        let cfg = Config::default();
        let hints = ColumnHints::default();
        assert_eq!(d.meta_type("LONG", None, &hints, &cfg), MetaType::B);
        // Everyone else sees LONG as numeric.
        assert_eq!(metatype::resolve("LONG", None, &hints, &cfg), MetaType::N);
    }

    #[test]
    fn triggers_emit_sequence_and_trigger() {
        let d = OracleDialect;
        let table = TableRef {
            sql: "EMP".to_string(),
            raw: "EMP".to_string(),
        };
        let sql = d.triggers(&table, "id", false);
        assert_eq!(sql.len(), 2);
        assert_eq!(sql[0], "CREATE SEQUENCE SEQ_EMP");
        assert!(sql[1].starts_with("CREATE OR REPLACE TRIGGER TRIG_SEQ_EMP"));
        assert!(sql[1].contains("SEQ_EMP.nextval"));
    }

    #[test]
    fn replace_drops_sequence_first() {
        let d = OracleDialect;
        let table = TableRef {
            sql: "EMP".to_string(),
            raw: "EMP".to_string(),
        };
        let sql = d.triggers(&table, "id", true);
        assert_eq!(sql[0], "DROP SEQUENCE SEQ_EMP");
    }

    #[test]
    fn sequence_names_respect_identifier_limit() {
        let long = "a_really_long_table_name_indeed_yes";
        assert!(OracleDialect::sequence_name(long).len() <= MAX_IDENTIFIER);
    }

    #[test]
    fn bitmap_index() {
        let d = OracleDialect;
        let opts = crate::spec::IndexOptions {
            bitmap: true,
            ..Default::default()
        };
        let sql = d.index_sql("ix_flag", "t", &["flag".to_string()], &opts);
        assert_eq!(sql, vec!["CREATE BITMAP INDEX ix_flag ON t (flag)"]);
    }
}
