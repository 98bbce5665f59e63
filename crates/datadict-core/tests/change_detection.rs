//! Change detection against an in-memory connection.

mod common;
use common::{MemoryConnection, dict};

use datadict_core::{ColumnMeta, TableOptions, execute_sql_array};

fn users_table() -> Vec<ColumnMeta> {
    vec![
        ColumnMeta {
            not_null: true,
            auto_increment: true,
            primary_key: true,
            ..ColumnMeta::new("id", "INTEGER")
        },
        ColumnMeta {
            max_length: Some(30),
            ..ColumnMeta::new("name", "VARCHAR")
        },
    ]
}

#[test]
fn missing_table_degrades_to_create() {
    let mut conn = MemoryConnection::new();
    let sql = dict("postgres")
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, name C(30)",
            &TableOptions::default(),
            false,
        )
        .unwrap();
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with("CREATE TABLE users ("));
}

#[test]
fn matching_table_yields_no_statements() {
    let mut conn = MemoryConnection::with_table("users", users_table());
    let sql = dict("postgres")
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, name C(30)",
            &TableOptions::default(),
            false,
        )
        .unwrap();
    assert!(sql.is_empty(), "unexpected statements: {sql:?}");
}

#[test]
fn reasserted_autoincrement_is_suppressed() {
    // The id column already auto-increments; re-requesting AUTO must not
    // produce an alter even though the spec restates everything.
    let mut conn = MemoryConnection::with_table("users", users_table());
    let sql = dict("mysql")
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, name C(30)",
            &TableOptions::default(),
            false,
        )
        .unwrap();
    assert!(sql.is_empty(), "unexpected statements: {sql:?}");
}

#[test]
fn widened_column_yields_one_alter() {
    let mut conn = MemoryConnection::with_table("users", users_table());
    let sql = dict("postgres")
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, name C(60)",
            &TableOptions::default(),
            false,
        )
        .unwrap();
    assert_eq!(
        sql,
        vec!["ALTER TABLE users ALTER COLUMN name TYPE VARCHAR(60)"]
    );
}

#[test]
fn new_column_and_dropped_column_in_one_pass() {
    let mut conn = MemoryConnection::with_table("users", users_table());
    let sql = dict("postgres")
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, email C(80) NOTNULL",
            &TableOptions::default(),
            true,
        )
        .unwrap();
    assert_eq!(
        sql,
        vec![
            "ALTER TABLE users ADD email VARCHAR(80) NOT NULL",
            "ALTER TABLE users DROP COLUMN name",
        ]
    );
}

#[test]
fn diff_is_idempotent_after_applying() {
    let dict = dict("postgres");
    let mut conn = MemoryConnection::with_table("users", users_table());
    let spec = "id I KEY AUTO, name C(60)";
    let first = dict
        .change_table_sql(&mut conn, "users", spec, &TableOptions::default(), false)
        .unwrap();
    assert_eq!(first.len(), 1);

    // Simulate the database state after the alter ran.
    let mut widened = users_table();
    widened[1].max_length = Some(60);
    conn.add_table("users", widened);
    let second = dict
        .change_table_sql(&mut conn, "users", spec, &TableOptions::default(), false)
        .unwrap();
    assert!(second.is_empty(), "unexpected statements: {second:?}");
}

#[test]
fn generated_statements_run_through_the_connection() {
    let dict = dict("postgres");
    let mut conn = MemoryConnection::new();
    let sql = dict
        .change_table_sql(
            &mut conn,
            "users",
            "id I KEY AUTO, name C(30)",
            &TableOptions::default(),
            false,
        )
        .unwrap();
    let executed = execute_sql_array(&mut conn, &sql, false).unwrap();
    assert_eq!(executed, 1);
    assert_eq!(conn.executed, sql);
}
