//! The connection seam.
//!
//! The generator itself never talks to a database; change detection needs
//! one metadata read and the batch helper needs an execute call, both
//! obtained through this trait. Implementations wrap whatever driver the
//! application already uses.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::diff::ColumnMeta;
use crate::error::Result;

/// Database access as consumed by this crate.
pub trait Connection {
    /// Column metadata for `table`, keyed by column name. `None` (or an
    /// empty map) means the table does not exist.
    fn meta_columns(&mut self, table: &str) -> Result<Option<BTreeMap<String, ColumnMeta>>>;

    /// Table names visible to this connection, optionally filtered by a
    /// driver-interpreted mask.
    fn meta_tables(&mut self, mask: Option<&str>) -> Result<Vec<String>>;

    /// Executes one DDL statement.
    fn execute(&mut self, sql: &str) -> Result<()>;
}

/// Executes a generated statement list in order and returns how many
/// statements succeeded.
///
/// With `continue_on_error` a failing statement is logged and skipped;
/// without it the first failure aborts the batch.
pub fn execute_sql_array(
    conn: &mut dyn Connection,
    statements: &[String],
    continue_on_error: bool,
) -> Result<usize> {
    let mut executed = 0;
    for sql in statements {
        match conn.execute(sql) {
            Ok(()) => {
                debug!(%sql, "executed");
                executed += 1;
            }
            Err(err) => {
                if !continue_on_error {
                    return Err(err);
                }
                warn!(%sql, %err, "statement failed, continuing");
            }
        }
    }
    Ok(executed)
}
