//! DDL statement generation.
//!
//! [`DataDict`] binds a dialect to a configuration and turns parsed field
//! specs into ordered, ready-to-execute statement lists. Statement order is
//! part of the contract: drops precede creates under REPLACE, sequence and
//! trigger emulation follows the CREATE TABLE it serves, and index creation
//! comes last.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::Config;
use crate::connection::Connection;
use crate::dialect::{self, Dialect, ProcessedLine, RenderedField, TableRef};
use crate::diff::{self, ColumnMeta, FieldState};
use crate::error::{DictError, Result};
use crate::metatype::MetaType;
use crate::spec::{
    self, DefaultSpec, FieldDescriptor, IndexOptions, TableOptions, TableSpec, TypeSpec,
    parser::{self, FieldInput},
};

/// Column names are padded to this width in CREATE TABLE output, which is
/// what makes multi-column statements line up when printed.
const NAME_PAD: usize = 24;

/// The data dictionary: a dialect plus configuration, exposing the DDL
/// generation operations.
pub struct DataDict {
    dialect: Box<dyn Dialect>,
    config: Config,
}

impl DataDict {
    /// Creates a dictionary for a registered dialect name or driver alias.
    ///
    /// # Errors
    /// Returns [`DictError::UnknownDialect`] when no dialect is registered
    /// under `name`.
    pub fn new(name: &str, config: Config) -> Result<Self> {
        let dialect =
            dialect::dialect(name).ok_or_else(|| DictError::UnknownDialect(name.to_string()))?;
        Ok(Self { dialect, config })
    }

    /// Creates a dictionary around an explicit dialect value, for dialects
    /// constructed with non-default settings.
    #[must_use]
    pub fn with_dialect(dialect: Box<dyn Dialect>, config: Config) -> Self {
        Self { dialect, config }
    }

    /// The active dialect.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Statements creating a table from a field spec.
    ///
    /// With `options.replace` the existing table (and any emulated
    /// auto-increment artifact) is dropped first; with `options.drop` only
    /// the drop statements are returned.
    ///
    /// # Errors
    /// Returns [`DictError::FieldSpec`] when the field spec is malformed.
    pub fn create_table_sql<'a>(
        &self,
        table: &str,
        fields: impl Into<FieldInput<'a>>,
        options: &TableOptions,
    ) -> Result<Vec<String>> {
        let spec = parser::parse(fields, &self.config)?;
        let table = self.table_ref(table);
        let fields = self.prepare(spec.fields);
        let auto_field = fields
            .iter()
            .find(|f| f.auto_increment)
            .map(|f| f.bare_name().to_string());

        let mut sql = Vec::new();
        let mut auto_dropped = false;
        if options.replace || options.drop {
            sql.push(self.dialect.drop_table_sql(&table.sql));
            if auto_field.is_some() {
                if let Some(stmt) = self.dialect.drop_auto_increment(&table) {
                    sql.push(stmt);
                    auto_dropped = true;
                }
            }
            if options.drop {
                return Ok(sql);
            }
        }

        let mut primary_key = spec.primary_key.clone();
        let mut lines = Vec::with_capacity(fields.len());
        for field in &fields {
            let rendered = self.render(field, &mut primary_key);
            lines.push(format!(
                "{:<NAME_PAD$} {}{}",
                rendered.name_sql, rendered.type_sql, rendered.suffix
            ));
        }

        let mut stmt = format!("CREATE TABLE {} (\n", table.sql);
        stmt.push_str(&lines.join(",\n"));
        if !primary_key.is_empty() {
            let cols: Vec<String> = primary_key.iter().map(|c| self.name_quote(c, false)).collect();
            stmt.push_str(",\n                 PRIMARY KEY (");
            stmt.push_str(&cols.join(", "));
            stmt.push(')');
        }
        if let Some(constraints) = &options.constraints {
            stmt.push('\n');
            stmt.push_str(constraints);
        }
        if let Some(constraints) = options.dialect_constraints.get(self.dialect.name()) {
            stmt.push('\n');
            stmt.push_str(constraints);
        }
        stmt.push_str("\n)");
        if let Some(suffix) = options.dialect_suffix.get(self.dialect.name()) {
            stmt.push(' ');
            stmt.push_str(suffix);
        }
        sql.push(stmt);

        if let Some(auto_field) = &auto_field {
            // The replace path above already dropped the emulated artifact;
            // asking the trigger hook to drop it again would fail at run time.
            let drop_first = options.replace && !auto_dropped;
            sql.extend(self.dialect.triggers(&table, auto_field, drop_first));
        }
        for index in &spec.indexes {
            sql.extend(self.index_statements(&table, &index.name, &index.columns, &index.options));
        }
        Ok(sql)
    }

    /// A CREATE DATABASE statement, with any option text keyed to the
    /// active dialect appended.
    #[must_use]
    pub fn create_database_sql(
        &self,
        name: &str,
        options: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut stmt = format!("CREATE DATABASE {}", self.name_quote(name, false));
        if let Some(suffix) = options.get(self.dialect.name()) {
            stmt.push(' ');
            stmt.push_str(suffix);
        }
        vec![stmt]
    }

    /// Statements adding the spec'd columns to an existing table. Dialects
    /// that accept several column definitions in one ALTER get a single
    /// combined statement.
    ///
    /// # Errors
    /// Returns [`DictError::FieldSpec`] when the field spec is malformed.
    pub fn add_column_sql<'a>(
        &self,
        table: &str,
        fields: impl Into<FieldInput<'a>>,
    ) -> Result<Vec<String>> {
        let spec = parser::parse(fields, &self.config)?;
        let table = self.table_ref(table);
        let fields = self.prepare(spec.fields);
        let mut defs = Vec::with_capacity(fields.len());
        for field in &fields {
            let rendered = self.render(field, &mut Vec::new());
            defs.push(format!(
                "{} {}{}",
                rendered.name_sql, rendered.type_sql, rendered.suffix
            ));
        }
        let add = self.dialect.add_column_phrase();
        if self.dialect.one_statement_per_column() {
            Ok(defs
                .into_iter()
                .map(|def| format!("ALTER TABLE {} {add} {def}", table.sql))
                .collect())
        } else {
            Ok(vec![format!(
                "ALTER TABLE {} {add} {}",
                table.sql,
                defs.join(", ")
            )])
        }
    }

    /// Statements altering existing columns to match the spec. Returns an
    /// empty list (with a logged warning) on dialects without ALTER COLUMN
    /// support, so callers can detect the no-op.
    ///
    /// # Errors
    /// Returns [`DictError::FieldSpec`] when the field spec is malformed.
    pub fn alter_column_sql<'a>(
        &self,
        table: &str,
        fields: impl Into<FieldInput<'a>>,
    ) -> Result<Vec<String>> {
        let spec = parser::parse(fields, &self.config)?;
        let table = self.table_ref(table);
        if !self.dialect.supports_alter_column() {
            warn!(
                table = %table.raw,
                dialect = self.dialect.name(),
                "ALTER COLUMN is not supported; no statements generated"
            );
            return Ok(Vec::new());
        }
        let fields = self.prepare(spec.fields);
        let mut sql = Vec::new();
        for field in &fields {
            let rendered = self.render(field, &mut Vec::new());
            merge(&mut sql, self.dialect.alter_column(&table, &rendered, None));
        }
        Ok(sql)
    }

    /// Statements dropping the named columns.
    #[must_use]
    pub fn drop_column_sql(&self, table: &str, columns: &[&str]) -> Vec<String> {
        let table = self.table_ref(table);
        let drop = self.dialect.drop_column_phrase();
        let names: Vec<String> = columns.iter().map(|c| self.name_quote(c, false)).collect();
        if self.dialect.one_statement_per_column() {
            names
                .into_iter()
                .map(|name| format!("ALTER TABLE {} {drop} {name}", table.sql))
                .collect()
        } else {
            vec![format!(
                "ALTER TABLE {} {drop} {}",
                table.sql,
                names.join(", ")
            )]
        }
    }

    /// A column rename. `definition` carries the column's field spec for
    /// dialects whose rename syntax restates the full definition (MySQL
    /// CHANGE COLUMN).
    ///
    /// # Errors
    /// Returns [`DictError::FieldSpec`] when `definition` is malformed.
    pub fn rename_column_sql(
        &self,
        table: &str,
        old: &str,
        new: &str,
        definition: Option<&str>,
    ) -> Result<Vec<String>> {
        let table = self.table_ref(table);
        let def = match definition {
            Some(text) => {
                let spec = parser::parse(text, &self.config)?;
                let fields = self.prepare(spec.fields);
                fields.first().map(|field| {
                    let rendered = self.render(field, &mut Vec::new());
                    format!("{}{}", rendered.type_sql, rendered.suffix)
                })
            }
            None => None,
        };
        Ok(vec![self.dialect.rename_column_sql(
            &table.sql,
            &self.name_quote(old, false),
            &self.name_quote(new, false),
            def.as_deref(),
        )])
    }

    /// A table rename.
    #[must_use]
    pub fn rename_table_sql(&self, from: &str, to: &str) -> Vec<String> {
        let from = self.table_ref(from);
        let to = self.table_ref(to);
        vec![self.dialect.rename_table_sql(&from.sql, &to.sql)]
    }

    /// A table drop.
    #[must_use]
    pub fn drop_table_sql(&self, table: &str) -> Vec<String> {
        let table = self.table_ref(table);
        vec![self.dialect.drop_table_sql(&table.sql)]
    }

    /// Index creation, honoring the REPLACE/DROP lifecycle in `options`.
    /// Column entries may be expressions, so parens survive unquoted.
    #[must_use]
    pub fn create_index_sql(
        &self,
        index: &str,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Vec<String> {
        let table = self.table_ref(table);
        let columns: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        self.index_statements(&table, index, &columns, options)
    }

    /// An index drop.
    #[must_use]
    pub fn drop_index_sql(&self, index: &str, table: &str) -> Vec<String> {
        let table = self.table_ref(table);
        vec![self
            .dialect
            .drop_index_sql(&self.name_quote(index, false), &table.sql)]
    }

    /// Statements bringing a live table in line with the desired spec.
    ///
    /// Fetches the table's current columns through `conn` once; a missing
    /// table degrades to [`Self::create_table_sql`]. Otherwise each desired
    /// column is classified add/alter/unchanged in declaration order, and
    /// with `drop_missing` live columns absent from the spec are dropped
    /// after all adds and alters.
    ///
    /// # Errors
    /// Returns [`DictError::Connection`] when the metadata fetch fails and
    /// [`DictError::FieldSpec`] when the field spec is malformed.
    pub fn change_table_sql<'a>(
        &self,
        conn: &mut dyn Connection,
        table: &str,
        fields: impl Into<FieldInput<'a>>,
        options: &TableOptions,
        drop_missing: bool,
    ) -> Result<Vec<String>> {
        let input = fields.into();
        match conn.meta_columns(table)? {
            Some(existing) if !existing.is_empty() => {
                self.diff_table_sql(table, input, &existing, drop_missing)
            }
            _ => self.create_table_sql(table, input, options),
        }
    }

    /// The pure half of [`Self::change_table_sql`]: diffs against metadata
    /// the caller already holds.
    ///
    /// # Errors
    /// Returns [`DictError::FieldSpec`] when the field spec is malformed.
    pub fn diff_table_sql<'a>(
        &self,
        table: &str,
        fields: impl Into<FieldInput<'a>>,
        existing: &BTreeMap<String, ColumnMeta>,
        drop_missing: bool,
    ) -> Result<Vec<String>> {
        let spec = parser::parse(fields, &self.config)?;
        let table_ref = self.table_ref(table);
        let desired = self.prepare(spec.fields);

        let mut sql = Vec::new();
        let add = self.dialect.add_column_phrase();
        for field in &desired {
            match diff::classify(field, existing, self.dialect.as_ref(), &self.config) {
                FieldState::Add => {
                    let rendered = self.render(field, &mut Vec::new());
                    sql.push(format!(
                        "ALTER TABLE {} {add} {} {}{}",
                        table_ref.sql, rendered.name_sql, rendered.type_sql, rendered.suffix
                    ));
                }
                FieldState::Alter(altered) => {
                    if !self.dialect.supports_alter_column() {
                        warn!(
                            table = %table_ref.raw,
                            column = %altered.name,
                            dialect = self.dialect.name(),
                            "column differs but ALTER COLUMN is not supported"
                        );
                        continue;
                    }
                    let live = diff::find_column(existing, altered.bare_name());
                    let rendered = self.render(&altered, &mut Vec::new());
                    merge(&mut sql, self.dialect.alter_column(&table_ref, &rendered, live));
                }
                FieldState::Unchanged => {}
            }
        }
        if drop_missing {
            let diff = diff::diff_table(
                &desired,
                existing,
                self.dialect.as_ref(),
                &self.config,
                true,
            );
            for name in &diff.to_drop {
                sql.extend(self.drop_column_sql(&table_ref.raw, &[name.as_str()]));
            }
        }
        Ok(sql)
    }

    fn index_statements(
        &self,
        table: &TableRef,
        index: &str,
        columns: &[String],
        options: &IndexOptions,
    ) -> Vec<String> {
        if columns.is_empty() && !options.drop && !options.replace {
            return Vec::new();
        }
        let index = self.name_quote(index, false);
        let columns: Vec<String> = columns
            .iter()
            .map(|c| self.name_quote(c, true))
            .collect();
        self.dialect.index_sql(&index, &table.sql, &columns, options)
    }

    /// Applies the blob gate: text and blob columns lose NOT NULL and
    /// DEFAULT unless the dialect accepts them there.
    fn prepare(&self, mut fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
        for field in &mut fields {
            if field.ty.meta().is_some_and(MetaType::is_blob_family) {
                if !self.dialect.blob_allows_not_null() {
                    field.not_null = false;
                }
                if !self.dialect.blob_allows_default() {
                    field.default = None;
                }
            }
        }
        fields
    }

    fn render<'a>(
        &self,
        field: &'a FieldDescriptor,
        primary_key: &mut Vec<String>,
    ) -> RenderedField<'a> {
        let mut type_sql = self.type_with_size(field);
        let default_sql = self.render_default(field);
        let suffix =
            self.dialect
                .create_suffix(field, default_sql.as_deref(), &mut type_sql, primary_key);
        RenderedField {
            field,
            name_sql: self.name_quote(&field.name, false),
            type_sql,
            suffix,
            default_sql,
        }
    }

    /// The native type with the declared size appended, unless the type
    /// already carries parens, takes no size on this dialect, or is a
    /// text/blob type. ENUM value lists take the size's place.
    fn type_with_size(&self, field: &FieldDescriptor) -> String {
        let (base, meta) = match &field.ty {
            TypeSpec::Meta(meta) => (self.dialect.actual_type(*meta), Some(*meta)),
            TypeSpec::Native(native) => (native.clone(), None),
        };
        if let Some(values) = field.options.get("ENUM") {
            return format!("{base}({values})");
        }
        if base.contains('(')
            || meta.is_some_and(MetaType::is_blob_family)
            || !self.dialect.size_allowed(&base, meta)
        {
            return base;
        }
        match (field.size, field.precision) {
            (Some(size), Some(precision)) => format!("{base}({size},{precision})"),
            (Some(size), None) => format!("{base}({size})"),
            _ => base,
        }
    }

    fn render_default(&self, field: &FieldDescriptor) -> Option<String> {
        let rendered = match field.default.as_ref()? {
            DefaultSpec::Raw(value) => value.clone(),
            DefaultSpec::SysDate => self.dialect.sys_date().to_string(),
            DefaultSpec::SysTimestamp => self.dialect.sys_timestamp().to_string(),
            DefaultSpec::Literal(value) => {
                let char_typed = match &field.ty {
                    TypeSpec::Meta(meta) => meta.is_char_family(),
                    TypeSpec::Native(_) => true,
                };
                if value.eq_ignore_ascii_case("null")
                    || value.starts_with('\'')
                    || (!char_typed && value.parse::<f64>().is_ok())
                {
                    value.clone()
                } else {
                    format!("'{}'", value.replace('\'', "''"))
                }
            }
        };
        Some(rendered)
    }

    /// Quotes a name with the dialect quote character when it is
    /// backtick-wrapped or contains anything beyond word characters.
    /// `allow_brackets` admits parens for index column expressions.
    fn name_quote(&self, name: &str, allow_brackets: bool) -> String {
        let name = name.trim();
        let quote = self.dialect.quote_char();
        if let Some(inner) = name
            .strip_prefix('`')
            .and_then(|n| n.strip_suffix('`'))
            .filter(|n| !n.is_empty())
        {
            return format!("{quote}{inner}{quote}");
        }
        let plain = !name.is_empty()
            && name.chars().all(|c| {
                c.is_ascii_alphanumeric()
                    || c == '_'
                    || (allow_brackets && matches!(c, '(' | ')'))
            });
        if plain {
            name.to_string()
        } else {
            format!("{quote}{name}{quote}")
        }
    }

    fn table_ref(&self, table: &str) -> TableRef {
        let raw = spec::strip_backticks(table.trim()).to_string();
        let quoted = self.name_quote(table, false);
        let sql = match &self.config.schema {
            Some(schema) => format!("{schema}.{quoted}"),
            None => quoted,
        };
        TableRef { sql, raw }
    }
}

/// Flattens one line's rewrite into the output, pre then main then post.
fn merge(sql: &mut Vec<String>, line: ProcessedLine) {
    sql.extend(line.pre);
    sql.extend(line.main);
    sql.extend(line.post);
}

/// Parses a field spec into a [`TableSpec`] without generating SQL, for
/// callers that want the descriptors themselves.
///
/// # Errors
/// Returns [`DictError::FieldSpec`] when the field spec is malformed.
pub fn parse_field_spec<'a>(
    fields: impl Into<FieldInput<'a>>,
    config: &Config,
) -> Result<TableSpec> {
    parser::parse(fields, config)
}
