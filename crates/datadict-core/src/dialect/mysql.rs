//! MySQL / MariaDB dialect.

use crate::diff::ColumnMeta;
use crate::metatype::MetaType;
use crate::spec::{FieldDescriptor, IndexOptions};

use super::{Dialect, ProcessedLine, RenderedField, TableRef};

/// MySQL-family rules: backtick quoting, `AUTO_INCREMENT`, `MODIFY COLUMN`
/// alters, and the `ALTER TABLE ... ADD INDEX` creation form when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect {
    /// Emit index creation as `ALTER TABLE ... ADD INDEX` instead of
    /// `CREATE INDEX`.
    pub alter_table_add_index: bool,
}

impl MySqlDialect {
    /// Dialect with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn sys_date(&self) -> &'static str {
        "CURDATE()"
    }

    fn sys_timestamp(&self) -> &'static str {
        "NOW()"
    }

    fn actual_type(&self, meta: MetaType) -> String {
        match meta {
            MetaType::C => "VARCHAR",
            MetaType::C2 => "NVARCHAR",
            MetaType::X => "TEXT",
            MetaType::X2 | MetaType::XL => "LONGTEXT",
            MetaType::B => "LONGBLOB",
            MetaType::D => "DATE",
            MetaType::T | MetaType::TS => "DATETIME",
            MetaType::L => "BOOLEAN",
            MetaType::R | MetaType::I | MetaType::I4 => "INTEGER",
            MetaType::I1 => "TINYINT",
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

    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        _type_sql: &mut String,
        _primary_key: &mut Vec<String>,
    ) -> String {
        let mut suffix = String::new();
        if field.unsigned {
            suffix.push_str(" UNSIGNED");
        }
        if field.not_null {
            suffix.push_str(" NOT NULL");
        }
        if let Some(default) = default_sql {
            suffix.push_str(" DEFAULT ");
            suffix.push_str(default);
        }
        if field.auto_increment {
            suffix.push_str(" AUTO_INCREMENT");
        }
        if let Some(constraint) = &field.constraint {
            suffix.push(' ');
            suffix.push_str(constraint);
        }
        suffix
    }

    fn alter_column_phrase(&self) -> &'static str {
        "MODIFY COLUMN"
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table}")
    }

    fn rename_column_sql(
        &self,
        table: &str,
        old: &str,
        new: &str,
        column_def: Option<&str>,
    ) -> String {
        // Pre-8.0 servers need the full definition restated.
        let def = column_def.unwrap_or("");
        format!("ALTER TABLE {table} CHANGE COLUMN {old} {new} {def}")
            .trim_end()
            .to_string()
    }

    fn drop_index_sql(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {index} ON {table}")
    }

    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        _live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        ProcessedLine::statement(format!(
            "ALTER TABLE {} MODIFY COLUMN {} {}{}",
            table.sql, rendered.name_sql, rendered.type_sql, rendered.suffix
        ))
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
        let modifier = if options.unique {
            " UNIQUE"
        } else if options.fulltext {
            " FULLTEXT"
        } else {
            ""
        };
        let cols = columns.join(", ");
        let mut stmt = if self.alter_table_add_index {
            format!("ALTER TABLE {table} ADD{modifier} INDEX {index} ({cols})")
        } else {
            format!("CREATE{modifier} INDEX {index} ON {table} ({cols})")
        };
        if let Some(extra) = options.dialect_text.get(self.name()) {
            stmt.push(' ');
            stmt.push_str(extra);
        }
        sql.push(stmt);
        sql
    }
}
