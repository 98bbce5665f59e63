//! # datadict-core
//!
//! Portable DDL generation from a compact field-spec mini-language.
//!
//! This crate provides:
//! - A tokenizer and parser for field specs like `id I KEY AUTO, name C(60)`
//! - A portable metatype layer mapping vendor type names onto a small closed set
//! - Dialect modules generating CREATE/ALTER/DROP statements for ten databases
//! - Change detection that diffs a desired table shape against live metadata
//!   and emits only the minimal ALTER statements
//!
//! ## Generating a table
//!
//! ```rust
//! use datadict_core::{Config, DataDict, TableOptions};
//!
//! let dict = DataDict::new("mysql", Config::default()).unwrap();
//! let sql = dict
//!     .create_table_sql("users", "id I KEY AUTO, name C(60) NOTNULL", &TableOptions::default())
//!     .unwrap();
//!
//! assert_eq!(sql.len(), 1);
//! assert!(sql[0].starts_with("CREATE TABLE users ("));
//! assert!(sql[0].contains("AUTO_INCREMENT"));
//! ```
//!
//! ## Diffing against a live table
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use datadict_core::{ColumnMeta, Config, DataDict};
//!
//! let dict = DataDict::new("postgres", Config::default()).unwrap();
//! let mut existing = BTreeMap::new();
//! existing.insert("NAME".to_string(), ColumnMeta {
//!     max_length: Some(30),
//!     ..ColumnMeta::new("name", "VARCHAR")
//! });
//!
//! // Widening the column yields one ALTER; the matching spec yields none.
//! let sql = dict.diff_table_sql("users", "name C(60)", &existing, false).unwrap();
//! assert_eq!(sql, vec!["ALTER TABLE users ALTER COLUMN name TYPE VARCHAR(60)"]);
//! ```
//!
//! The generated statements are never executed by this crate; callers run
//! them through their own driver, optionally via [`execute_sql_array`] and
//! the [`Connection`] trait.

pub mod config;
pub mod connection;
pub mod ddl;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod metatype;
pub mod spec;

pub use config::Config;
pub use connection::{Connection, execute_sql_array};
pub use ddl::{DataDict, parse_field_spec};
pub use dialect::{Dialect, dialect};
pub use diff::{ColumnMeta, FieldState, TableDiff, diff_table};
pub use error::{DictError, Result};
pub use metatype::{ColumnHints, MetaType};
pub use spec::{
    DefaultSpec, FieldDescriptor, IndexDescriptor, IndexOptions, RawField, TableOptions,
    TableSpec, TypeSpec,
};
