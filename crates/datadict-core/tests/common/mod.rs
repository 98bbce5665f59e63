#![allow(dead_code)]

use std::collections::BTreeMap;

use datadict_core::{ColumnMeta, Config, Connection, DataDict, Result};

pub fn dict(name: &str) -> DataDict {
    DataDict::new(name, Config::default())
        .unwrap_or_else(|e| panic!("dialect {name} should be registered: {e}"))
}

/// An in-memory stand-in for a database connection: tables are maps of
/// upper-cased column name to metadata, execute records statements.
#[derive(Default)]
pub struct MemoryConnection {
    pub tables: BTreeMap<String, BTreeMap<String, ColumnMeta>>,
    pub executed: Vec<String>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: &str, columns: Vec<ColumnMeta>) -> Self {
        let mut conn = Self::default();
        conn.add_table(table, columns);
        conn
    }

    pub fn add_table(&mut self, table: &str, columns: Vec<ColumnMeta>) {
        let columns = columns
            .into_iter()
            .map(|c| (c.name.to_ascii_uppercase(), c))
            .collect();
        self.tables.insert(table.to_ascii_uppercase(), columns);
    }
}

impl Connection for MemoryConnection {
    fn meta_columns(&mut self, table: &str) -> Result<Option<BTreeMap<String, ColumnMeta>>> {
        Ok(self.tables.get(&table.to_ascii_uppercase()).cloned())
    }

    fn meta_tables(&mut self, _mask: Option<&str>) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        self.executed.push(sql.to_string());
        Ok(())
    }
}
