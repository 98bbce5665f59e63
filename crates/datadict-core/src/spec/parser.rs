//! Field descriptor builder: token statements (or the structured form)
//! into normalized [`FieldDescriptor`]s plus primary-key and index lists.

use crate::config::Config;
use crate::error::{DictError, Result};

use super::tokenizer::tokenize_fields;
use super::{
    DefaultSpec, FieldDescriptor, IndexDescriptor, IndexOptions, RawField, TableSpec, TypeSpec,
    strip_backticks,
};

/// A field definition source: the mini-language string or the structured
/// array form.
#[derive(Debug, Clone, Copy)]
pub enum FieldInput<'a> {
    /// Comma-separated statements in the mini-language.
    Text(&'a str),
    /// Pre-structured definitions with uppercase attribute keys.
    Structured(&'a [RawField]),
}

impl<'a> From<&'a str> for FieldInput<'a> {
    fn from(spec: &'a str) -> Self {
        Self::Text(spec)
    }
}

impl<'a> From<&'a [RawField]> for FieldInput<'a> {
    fn from(fields: &'a [RawField]) -> Self {
        Self::Structured(fields)
    }
}

impl<'a> From<&'a Vec<RawField>> for FieldInput<'a> {
    fn from(fields: &'a Vec<RawField>) -> Self {
        Self::Structured(fields)
    }
}

/// Keywords that never serve as a value for a preceding DEFAULT,
/// CONSTRAINT or INDEX keyword.
const ATTRIBUTE_KEYWORDS: &[&str] = &[
    "DEFAULT",
    "DEF",
    "CONSTRAINT",
    "INDEX",
    "KEY",
    "PRIMARY",
    "AUTO",
    "AUTOINCREMENT",
    "NOTNULL",
    "NOQUOTE",
    "DEFDATE",
    "DEFTIMESTAMP",
    "UNSIGNED",
    "UNIQUE",
];

/// Parses a field definition into the full desired table shape.
///
/// # Errors
///
/// Returns [`DictError::FieldSpec`] when a statement lacks a NAME or TYPE,
/// or (in strict mode) on duplicate field names and unrecognized tokens.
pub fn parse<'a>(input: impl Into<FieldInput<'a>>, config: &Config) -> Result<TableSpec> {
    match input.into() {
        FieldInput::Text(spec) => parse_statements(&tokenize_fields(spec), config),
        FieldInput::Structured(fields) => parse_structured(fields, config),
    }
}

fn parse_statements(statements: &[Vec<String>], config: &Config) -> Result<TableSpec> {
    let mut spec = SpecBuilder::new(config);
    for tokens in statements {
        spec.push(parse_statement(tokens, config)?)?;
    }
    Ok(spec.finish())
}

fn parse_structured(fields: &[RawField], config: &Config) -> Result<TableSpec> {
    let mut spec = SpecBuilder::new(config);
    for raw in fields {
        spec.push(from_raw(raw)?)?;
    }
    Ok(spec.finish())
}

fn parse_statement(tokens: &[String], config: &Config) -> Result<FieldDescriptor> {
    let name = tokens
        .first()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DictError::FieldSpec("field statement has no NAME".into()))?;
    let ty = tokens
        .get(1)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DictError::FieldSpec(format!("field {name} has no TYPE")))?;

    let mut field = FieldDescriptor::new(name.clone(), TypeSpec::parse(ty));
    let mut noquote = false;

    let mut i = 2;
    while i < tokens.len() {
        let token = &tokens[i];
        match token.to_ascii_uppercase().as_str() {
            "DEFAULT" | "DEF" => {
                if let Some(value) = value_token(tokens, i) {
                    field.default = Some(DefaultSpec::Literal(value.clone()));
                    i += 1;
                }
            }
            "CONSTRAINT" => {
                if let Some(value) = value_token(tokens, i) {
                    field.constraint = Some(value.clone());
                    i += 1;
                }
            }
            "INDEX" => {
                if let Some(value) = value_token(tokens, i) {
                    field.index = Some(value.clone());
                    i += 1;
                } else {
                    // Bare INDEX names the index after the column, keeping
                    // the column's quoting.
                    field.index = Some(if field.name.starts_with('`') {
                        format!("`idx_{}`", field.bare_name())
                    } else {
                        format!("idx_{}", field.bare_name())
                    });
                }
            }
            "KEY" | "PRIMARY" => {
                field.primary_key = true;
                field.not_null = true;
            }
            "AUTO" | "AUTOINCREMENT" => {
                field.auto_increment = true;
                field.not_null = true;
            }
            "NOTNULL" => field.not_null = true,
            "NOQUOTE" => noquote = true,
            "DEFDATE" => field.default = Some(DefaultSpec::SysDate),
            "DEFTIMESTAMP" => field.default = Some(DefaultSpec::SysTimestamp),
            "UNSIGNED" => field.unsigned = true,
            "UNIQUE" => field.unique = true,
            _ if i == 2 => {
                if let Some((size, precision)) = split_size(token) {
                    field.size = Some(size);
                    field.precision = precision;
                } else if matches!(field.ty, TypeSpec::Native(_)) {
                    // Value list of an ENUM-style native type.
                    field
                        .options
                        .insert("ENUM".to_string(), token.clone());
                } else {
                    unknown_token(&field.name, token, config)?;
                }
            }
            _ => unknown_token(&field.name, token, config)?,
        }
        i += 1;
    }

    if noquote {
        if let Some(DefaultSpec::Literal(v)) = field.default.take() {
            field.default = Some(DefaultSpec::Raw(v));
        }
    }
    Ok(field)
}

fn from_raw(raw: &RawField) -> Result<FieldDescriptor> {
    if raw.name.is_empty() {
        return Err(DictError::FieldSpec("field entry has no NAME".into()));
    }
    if raw.ty.is_empty() {
        return Err(DictError::FieldSpec(format!(
            "field {} has no TYPE",
            raw.name
        )));
    }

    let mut field = FieldDescriptor::new(raw.name.clone(), TypeSpec::parse(&raw.ty));
    if let Some(size) = raw.size.as_deref() {
        if let Some((s, p)) = split_size(size) {
            field.size = Some(s);
            field.precision = p;
        }
    }
    field.default = if raw.deftimestamp {
        Some(DefaultSpec::SysTimestamp)
    } else if raw.defdate {
        Some(DefaultSpec::SysDate)
    } else {
        raw.default.clone().map(|v| {
            if raw.noquote {
                DefaultSpec::Raw(v)
            } else {
                DefaultSpec::Literal(v)
            }
        })
    };
    field.not_null = raw.notnull || raw.key || raw.autoincrement;
    field.primary_key = raw.key;
    field.auto_increment = raw.autoincrement;
    field.unsigned = raw.unsigned;
    field.constraint = raw.constraint.clone();
    field.unique = raw.unique;
    field.index = raw.index.as_deref().map(|name| {
        if name.is_empty() {
            if raw.name.starts_with('`') {
                format!("`idx_{}`", strip_backticks(&raw.name))
            } else {
                format!("idx_{}", raw.name)
            }
        } else {
            name.to_string()
        }
    });
    if let Some(values) = &raw.enum_values {
        field.options.insert("ENUM".to_string(), values.clone());
    }
    Ok(field)
}

/// The token following a DEFAULT/CONSTRAINT/INDEX keyword, when it exists
/// and is not itself an attribute keyword.
fn value_token(tokens: &[String], i: usize) -> Option<&String> {
    tokens
        .get(i + 1)
        .filter(|t| !ATTRIBUTE_KEYWORDS.contains(&t.to_ascii_uppercase().as_str()))
}

/// Splits a size token into size and optional precision. Both `.` and `,`
/// separate the two parts.
fn split_size(token: &str) -> Option<(u32, Option<u32>)> {
    let mut parts = token.splitn(2, ['.', ',']);
    let size = parts.next()?.parse().ok()?;
    match parts.next() {
        None => Some((size, None)),
        Some(prec) => Some((size, Some(prec.parse().ok()?))),
    }
}

fn unknown_token(field: &str, token: &str, config: &Config) -> Result<()> {
    if config.strict {
        return Err(DictError::FieldSpec(format!(
            "unrecognized token {token:?} in definition of {field}"
        )));
    }
    tracing::debug!(field, token, "ignoring unrecognized field attribute");
    Ok(())
}

/// Accumulates parsed fields, rejecting or skipping duplicates and
/// collecting the primary-key and index lists.
struct SpecBuilder<'a> {
    config: &'a Config,
    fields: Vec<FieldDescriptor>,
    primary_key: Vec<String>,
    indexes: Vec<IndexDescriptor>,
}

impl<'a> SpecBuilder<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            fields: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
        }
    }

    fn push(&mut self, field: FieldDescriptor) -> Result<()> {
        let key = field.key();
        if self.fields.iter().any(|f| f.key() == key) {
            if self.config.strict {
                return Err(DictError::FieldSpec(format!(
                    "field {} defined twice",
                    field.name
                )));
            }
            tracing::warn!(field = %field.name, "field defined twice, ignoring repeat");
            return Ok(());
        }

        if field.primary_key {
            self.primary_key.push(field.bare_name().to_string());
        }
        if let Some(index_name) = &field.index {
            let column = field.name.clone();
            let unique = field.unique;
            match self
                .indexes
                .iter_mut()
                .find(|idx| idx.name.eq_ignore_ascii_case(index_name))
            {
                Some(idx) => {
                    idx.columns.push(column);
                    idx.options.unique |= unique;
                }
                None => self.indexes.push(IndexDescriptor {
                    name: index_name.clone(),
                    columns: vec![column],
                    options: IndexOptions {
                        unique,
                        ..IndexOptions::default()
                    },
                }),
            }
        }
        self.fields.push(field);
        Ok(())
    }

    fn finish(self) -> TableSpec {
        TableSpec {
            fields: self.fields,
            primary_key: self.primary_key,
            indexes: self.indexes,
        }
    }
}
