//! Dialect-specific DDL rules.
//!
//! Every supported database is one [`Dialect`] implementation: the
//! metatype → native type mapping, the column suffix order, statement
//! templates, and hooks for the structural quirks (identity columns,
//! emulated sequences, ALTER rewriting). Dialects are selected from the
//! [`registry`](dialect) by name.

mod db2;
mod generic;
mod informix;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sapdb;
mod sqlite;
mod sybase;

pub use db2::Db2Dialect;
pub use generic::GenericDialect;
pub use informix::InformixDialect;
pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sapdb::SapDbDialect;
pub use sqlite::SqliteDialect;
pub use sybase::SybaseDialect;

use crate::config::Config;
use crate::diff::ColumnMeta;
use crate::metatype::{self, ColumnHints, MetaType};
use crate::spec::{FieldDescriptor, IndexOptions};

/// A table name in both SQL-ready (quoted, schema-qualified) and raw form.
/// Some dialects need the raw name to derive sequence or constraint names.
#[derive(Debug, Clone)]
pub struct TableRef {
    /// Quoted and schema-qualified, ready for statement text.
    pub sql: String,
    /// The caller-supplied name, unquoted and unqualified.
    pub raw: String,
}

/// A column rendered for statement assembly.
#[derive(Debug)]
pub struct RenderedField<'a> {
    /// The parsed descriptor.
    pub field: &'a FieldDescriptor,
    /// Quoted column name.
    pub name_sql: String,
    /// Native type with any size suffix applied.
    pub type_sql: String,
    /// Dialect suffix (leading space or empty).
    pub suffix: String,
    /// Rendered DEFAULT value, when one applies.
    pub default_sql: Option<String>,
}

/// Statements produced for one column by a dialect rewriting hook, merged
/// into the final output in pre → main → post order.
#[derive(Debug, Default)]
pub struct ProcessedLine {
    /// Statements emitted before the main statement(s).
    pub pre: Vec<String>,
    /// The statement(s) replacing the generic line.
    pub main: Vec<String>,
    /// Statements emitted after the main statement(s).
    pub post: Vec<String>,
}

impl ProcessedLine {
    /// A single plain statement with no pre/post companions.
    #[must_use]
    pub fn statement(sql: String) -> Self {
        Self {
            main: vec![sql],
            ..Self::default()
        }
    }

    /// No statements at all (unsupported operation).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-database DDL generation rules.
///
/// Default method bodies implement the ANSI-oriented behavior; dialects
/// override only what differs.
pub trait Dialect {
    /// Registry name of this dialect.
    fn name(&self) -> &'static str;

    /// Identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// System date function used for DEFDATE defaults.
    fn sys_date(&self) -> &'static str {
        "CURRENT_DATE"
    }

    /// System timestamp function used for DEFTIMESTAMP defaults.
    fn sys_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Maps a portable metatype to this dialect's native type keyword.
    fn actual_type(&self, meta: MetaType) -> String;

    /// Resolves a native type name to a portable metatype. The default
    /// delegates to the shared forward table; dialects override to add
    /// vendor special cases.
    fn meta_type(
        &self,
        native: &str,
        max_length: Option<i64>,
        hints: &ColumnHints,
        config: &Config,
    ) -> MetaType {
        metatype::resolve(native, max_length, hints, config)
    }

    /// Whether NOT NULL may be applied to text/blob columns.
    fn blob_allows_not_null(&self) -> bool {
        false
    }

    /// Whether DEFAULT may be applied to text/blob columns.
    fn blob_allows_default(&self) -> bool {
        false
    }

    /// Whether a declared size may be appended to this rendered type.
    fn size_allowed(&self, type_sql: &str, meta: Option<MetaType>) -> bool {
        let _ = (type_sql, meta);
        true
    }

    /// Builds the per-column suffix: everything after `name type(size)`.
    /// Must start with a space when non-empty. `type_sql` is mutable so a
    /// dialect can swap the whole type (SERIAL); `primary_key` is mutable
    /// so a dialect can claim the key inline (SQLite).
    fn create_suffix(
        &self,
        field: &FieldDescriptor,
        default_sql: Option<&str>,
        type_sql: &mut String,
        primary_key: &mut Vec<String>,
    ) -> String {
        let _ = (type_sql, primary_key);
        standard_suffix(field, default_sql)
    }

    /// Phrase after `ALTER TABLE t` when adding a column.
    fn add_column_phrase(&self) -> &'static str {
        "ADD"
    }

    /// Phrase after `ALTER TABLE t` when altering a column.
    fn alter_column_phrase(&self) -> &'static str {
        "ALTER COLUMN"
    }

    /// Phrase after `ALTER TABLE t` when dropping a column.
    fn drop_column_phrase(&self) -> &'static str {
        "DROP COLUMN"
    }

    /// Whether ALTER COLUMN is supported at all.
    fn supports_alter_column(&self) -> bool {
        true
    }

    /// Whether ADD/DROP COLUMN emit one statement per column, or combine
    /// all columns into a single statement.
    fn one_statement_per_column(&self) -> bool {
        true
    }

    /// DROP TABLE statement.
    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE {table}")
    }

    /// Table rename statement.
    fn rename_table_sql(&self, from: &str, to: &str) -> String {
        format!("RENAME TABLE {from} TO {to}")
    }

    /// Column rename statement. `column_def` carries the new column's full
    /// definition for dialects whose rename syntax restates it.
    fn rename_column_sql(
        &self,
        table: &str,
        old: &str,
        new: &str,
        column_def: Option<&str>,
    ) -> String {
        let _ = column_def;
        format!("ALTER TABLE {table} RENAME COLUMN {old} TO {new}")
    }

    /// DROP INDEX statement.
    fn drop_index_sql(&self, index: &str, table: &str) -> String {
        let _ = table;
        format!("DROP INDEX {index}")
    }

    /// Rewrites one ALTER COLUMN line. `live` carries the column's current
    /// metadata when the alter came from change detection, and is absent on
    /// the pure generation path.
    fn alter_column(
        &self,
        table: &TableRef,
        rendered: &RenderedField<'_>,
        live: Option<&ColumnMeta>,
    ) -> ProcessedLine {
        let _ = live;
        ProcessedLine::statement(format!(
            "ALTER TABLE {} {} {} {}{}",
            table.sql,
            self.alter_column_phrase(),
            rendered.name_sql,
            rendered.type_sql,
            rendered.suffix
        ))
    }

    /// Index creation, including the REPLACE/DROP lifecycle. Names and
    /// columns arrive pre-quoted.
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
        let mut stmt = format!(
            "CREATE{unique} INDEX {index} ON {table} ({})",
            columns.join(", ")
        );
        if let Some(extra) = options.dialect_text.get(self.name()) {
            stmt.push(' ');
            stmt.push_str(extra);
        }
        sql.push(stmt);
        sql
    }

    /// Statements appended after CREATE TABLE to emulate auto-increment
    /// (sequences and triggers). `auto_field` is the first auto-increment
    /// column, `replace` is true when the table was just dropped and
    /// recreated.
    fn triggers(&self, table: &TableRef, auto_field: &str, replace: bool) -> Vec<String> {
        let _ = (table, auto_field, replace);
        Vec::new()
    }

    /// Statement dropping the emulated auto-increment artifact, emitted
    /// before DROP TABLE when the table had an auto-increment column.
    fn drop_auto_increment(&self, table: &TableRef) -> Option<String> {
        let _ = table;
        None
    }
}

/// The ANSI-oriented suffix: DEFAULT, then NOT NULL, then constraint text.
pub(crate) fn standard_suffix(field: &FieldDescriptor, default_sql: Option<&str>) -> String {
    let mut suffix = String::new();
    if let Some(default) = default_sql {
        suffix.push_str(" DEFAULT ");
        suffix.push_str(default);
    }
    if field.not_null {
        suffix.push_str(" NOT NULL");
    }
    if let Some(constraint) = &field.constraint {
        suffix.push(' ');
        suffix.push_str(constraint);
    }
    suffix
}

/// Looks up a dialect by name. Driver aliases map onto the same dialect
/// (`mysqli` → mysql, `oci8` → oracle, and so on).
#[must_use]
pub fn dialect(name: &str) -> Option<Box<dyn Dialect>> {
    let dialect: Box<dyn Dialect> = match name.to_ascii_lowercase().as_str() {
        "generic" => Box::new(GenericDialect),
        "mysql" | "mysqli" | "mariadb" => Box::new(MySqlDialect::new()),
        "postgres" | "postgresql" | "pgsql" => Box::new(PostgresDialect),
        "sqlite" | "sqlite3" => Box::new(SqliteDialect),
        "mssql" | "mssqlnative" | "sqlsrv" => Box::new(MssqlDialect),
        "oracle" | "oci8" => Box::new(OracleDialect),
        "db2" => Box::new(Db2Dialect),
        "informix" => Box::new(InformixDialect),
        "sybase" => Box::new(SybaseDialect),
        "sapdb" | "maxdb" => Box::new(SapDbDialect),
        _ => return None,
    };
    Some(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_aliases() {
        assert_eq!(dialect("mysqli").unwrap().name(), "mysql");
        assert_eq!(dialect("oci8").unwrap().name(), "oracle");
        assert_eq!(dialect("maxdb").unwrap().name(), "sapdb");
        assert!(dialect("dbase").is_none());
    }

    #[test]
    fn every_dialect_maps_every_metatype() {
        let all = [
            MetaType::C,
            MetaType::C2,
            MetaType::X,
            MetaType::X2,
            MetaType::XL,
            MetaType::B,
            MetaType::D,
            MetaType::T,
            MetaType::TS,
            MetaType::L,
            MetaType::I,
            MetaType::I1,
            MetaType::I2,
            MetaType::I4,
            MetaType::I8,
            MetaType::N,
            MetaType::F,
            MetaType::R,
        ];
        for name in [
            "generic", "mysql", "postgres", "sqlite", "mssql", "oracle", "db2", "informix",
            "sybase", "sapdb",
        ] {
            let d = dialect(name).unwrap();
            for meta in all {
                assert!(
                    !d.actual_type(meta).is_empty(),
                    "{name} has no mapping for {meta}"
                );
            }
        }
    }

    #[test]
    fn actual_type_round_trips_through_forward_table() {
        let config = Config::default();
        let hints = ColumnHints::default();
        // Canonical synonyms collapse (INT = INTEGER etc.), so assert the
        // forward resolution of each reverse mapping lands on a stable code.
        for name in ["generic", "mysql", "postgres", "sqlite", "mssql"] {
            let d = dialect(name).unwrap();
            for (meta, family) in [
                (MetaType::C, MetaType::C),
                (MetaType::D, MetaType::D),
                (MetaType::I, MetaType::I),
            ] {
                let native = d.actual_type(meta);
                let base = native.split('(').next().unwrap();
                let resolved = d.meta_type(base, None, &hints, &config);
                assert_eq!(resolved, family, "{name}: {meta} -> {native} -> {resolved}");
            }
        }
    }
}
