//! Microsoft SQL Server dialect.
//!
//! Defaults live in named default constraints, so altering a column with a
//! default first drops the existing constraint, alters the bare type, then
//! adds a fresh `DF__table__column` constraint as a post statement.

use crate::config::Config;
use crate::diff::ColumnMeta;
use crate::metatype::{ColumnHints, MetaType};
use crate::spec::{FieldDescriptor, IndexOptions};

use super::{Dialect, ProcessedLine, RenderedField, TableRef};

/// SQL Server rules (native driver family).
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// The default-constraint name this dialect assigns. Live constraint
    /// names are not visible to the pure generator, so drops target the
    /// same derived name.
    fn default_constraint_name(table: &str, column: &str) -> String {
        format!("DF__{table}__{column}")
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
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
            MetaType::C2 => "NVARCHAR",
            MetaType::X => "VARCHAR(MAX)",
            MetaType::X2 => "NVARCHAR(MAX)",
            MetaType::XL => "VARBINARY(MAX)",
            MetaType::B => "VARBINARY(MAX)",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "DATETIME",
            MetaType::L => "BIT",
            MetaType::R | MetaType::F => "REAL",
            MetaType::I1 => "TINYINT",
            MetaType::I2 => "SMALLINT",
            MetaType::I4 => "INT",
            MetaType::I | MetaType::I8 => "BIGINT",
            MetaType::N => "NUMERIC",
        }
        .to_string()
    }

    fn meta_type(
        &self,
        native: &str,
        max_length: Option<i64>,
        _hints: &ColumnHints,
        config: &Config,
    ) -> MetaType {
        let mut native = native.to_ascii_uppercase();
        // The MAX variants report length -1 and behave as lobs.
        if max_length == Some(-1) {
            native = match native.as_str() {
                "VARCHAR" => "CLOB".to_string(),
                "NVARCHAR" => "NCLOB".to_string(),
                "VARBINARY" => "IMAGE".to_string(),
                other => other.to_string(),
            };
        }
        match native.as_str() {
            "VARCHAR" => MetaType::C,
            "NVARCHAR" => MetaType::C2,
            "CLOB" => MetaType::X,
            "NCLOB" => MetaType::X2,
            "BINARY" | "VARBINARY" => MetaType::B,
            "TEXT" | "IMAGE" => MetaType::XL,
            "DATE" => MetaType::D,
            "TIME" | "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "DATETIMEOFFSET" => MetaType::T,
            "NUMERIC" | "DECIMAL" | "MONEY" | "SMALLMONEY" => MetaType::F,
            "REAL" => MetaType::R,
            "BIT" => MetaType::L,
            "SMALLINT" => MetaType::I2,
            "INT" | "INTEGER" => MetaType::I4,
            "BIGINT" => MetaType::I,
            _ => config.fallback_metatype,
        }
    }

    fn blob_allows_not_null(&self) -> bool {
        true
    }

    fn blob_allows_default(&self) -> bool {
        true
    }

    fn size_allowed(&self, type_sql: &str, meta: Option<MetaType>) -> bool {
        if matches!(type_sql, "INT" | "SMALLINT" | "TINYINT" | "BIGINT") {
            return false;
        }
        !matches!(meta, Some(MetaType::T | MetaType::TS))
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
            suffix.push_str(" IDENTITY(1,1)");
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

    fn one_statement_per_column(&self) -> bool {
        false
    }

    fn rename_table_sql(&self, from: &str, to: &str) -> String {
        format!("EXEC sp_rename '{from}','{to}'")
    }

    fn rename_column_sql(
        &self,
        table: &str,
        old: &str,
        new: &str,
        _column_def: Option<&str>,
    ) -> String {
        format!("EXEC sp_rename '{table}.{old}','{new}'")
    }

    fn drop_index_sql(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {index} ON {table}")
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        let mut line = ProcessedLine::default();
        let column = rendered.field.bare_name();
        let constraint = Self::default_constraint_name(&table.raw, column);

        // An existing default constraint blocks the type change.
        if live.is_some_and(|c| c.has_default) {
            line.pre.push(format!(
                "ALTER TABLE {} DROP CONSTRAINT {constraint}",
                table.sql
            ));
        }

        let nullability = if rendered.field.not_null {
            " NOT NULL"
        } else {
            " NULL"
        };
        line.main.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} {}{nullability}",
            table.sql, rendered.name_sql, rendered.type_sql
        ));

        if let Some(default) = &rendered.default_sql {
            line.post.push(format!(
                "ALTER TABLE {} ADD CONSTRAINT {constraint} DEFAULT {default} FOR {}",
                table.sql, rendered.name_sql
            ));
        }
        line
    }

    fn index_sql(
        &self,
        index: &str,
        table: &str,
        columns: &[String],
        options: &IndexOptions,
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
        let unique = if options.unique { " UNIQUE" } else { "" };
        let clustered = if options.clustered { " CLUSTERED" } else { "" };
        let mut stmt = format!(
            "CREATE{unique}{clustered} INDEX {index} ON {table} ({})",
            columns.join(", ")
        );
        if let Some(extra) = options.dialect_text.get(self.name()) {
            stmt.push(' ');
            stmt.push_str(extra);
        }
        sql.push(stmt);
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TypeSpec;

    #[test]
    fn identity_suffix_order() {
        let d = MssqlDialect;
        let mut f = FieldDescriptor::new("id", TypeSpec::Meta(MetaType::I));
        f.auto_increment = true;
        f.not_null = true;
        let mut ty = "BIGINT".to_string();
        let suffix = d.create_suffix(&f, None, &mut ty, &mut vec![]);
        assert_eq!(suffix, " IDENTITY(1,1) NOT NULL");
    }

    #[test]
    fn bare_column_gets_explicit_null() {
        let d = MssqlDialect;
        let f = FieldDescriptor::new("note", TypeSpec::Meta(MetaType::C));
        let mut ty = "VARCHAR".to_string();
        let suffix = d.create_suffix(&f, None, &mut ty, &mut vec![]);
        assert_eq!(suffix, " NULL");
    }

    #[test]
    fn int_family_never_takes_a_size() {
        let d = MssqlDialect;
        assert!(!d.size_allowed("INT", Some(MetaType::I4)));
        assert!(!d.size_allowed("BIGINT", Some(MetaType::I8)));
        assert!(d.size_allowed("VARCHAR", Some(MetaType::C)));
        assert!(!d.size_allowed("DATETIME", Some(MetaType::T)));
    }

    #[test]
    fn varchar_max_reports_as_text() {
        let d = MssqlDialect;
        let cfg = Config::default();
        let hints = ColumnHints::default();
        assert_eq!(d.meta_type("VARCHAR", Some(-1), &hints, &cfg), MetaType::X);
        assert_eq!(d.meta_type("VARCHAR", Some(50), &hints, &cfg), MetaType::C);
    }

    #[test]
    fn alter_with_default_rebuilds_constraint() {
        let d = MssqlDialect;
        let mut f = FieldDescriptor::new("qty", TypeSpec::Meta(MetaType::I4));
        f.not_null = true;
        let table = TableRef {
            sql: "orders".to_string(),
            raw: "orders".to_string(),
        };
        let rendered = RenderedField {
            field: &f,
            name_sql: "qty".to_string(),
            type_sql: "INT".to_string(),
            suffix: " DEFAULT 0 NOT NULL".to_string(),
            default_sql: Some("0".to_string()),
        };
        let live = ColumnMeta {
            name: "qty".to_string(),
            native_type: "INT".to_string(),
            max_length: None,
            scale: None,
            not_null: false,
            has_default: true,
            default_value: Some("1".to_string()),
            auto_increment: false,
            primary_key: false,
            binary: None,
        };
        let line = d.alter_column(&table, &rendered, Some(&live));
        assert_eq!(
            line.pre,
            vec!["ALTER TABLE orders DROP CONSTRAINT DF__orders__qty"]
        );
        assert_eq!(
            line.main,
            vec!["ALTER TABLE orders ALTER COLUMN qty INT NOT NULL"]
        );
        assert_eq!(
            line.post,
            vec!["ALTER TABLE orders ADD CONSTRAINT DF__orders__qty DEFAULT 0 FOR qty"]
        );
    }
}
