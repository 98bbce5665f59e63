//! End-to-end DDL generation across dialects.

mod common;
use common::dict;

use std::collections::BTreeMap;

use datadict_core::{Config, IndexOptions, MetaType, TableOptions, TypeSpec, parse_field_spec};

const SPEC: &str = "id I KEY AUTO, name C(60) NOTNULL, bio X, price N(10.2) DEFAULT 0";

#[test]
fn mysql_create_table() {
    let sql = dict("mysql").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert_eq!(sql.len(), 1);
    assert!(sql[0].contains("INTEGER NOT NULL AUTO_INCREMENT"));
    assert!(sql[0].contains("VARCHAR(60) NOT NULL"));
    assert!(sql[0].contains(" TEXT"));
    assert!(sql[0].contains("NUMERIC(10,2) DEFAULT 0"));
    assert!(sql[0].contains("PRIMARY KEY (id)"));
}

#[test]
fn postgres_create_table_uses_serial() {
    let sql = dict("postgres").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert!(sql[0].contains(" SERIAL"));
    assert!(!sql[0].contains("AUTO_INCREMENT"));
    assert!(sql[0].contains("PRIMARY KEY (id)"));
}

#[test]
fn mssql_create_table_uses_identity() {
    let sql = dict("mssql").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert!(sql[0].contains("IDENTITY(1,1) NOT NULL"));
    // Unconstrained columns get an explicit NULL.
    assert!(sql[0].contains("VARCHAR(MAX) NULL"));
}

#[test]
fn oracle_create_table_emulates_the_sequence() {
    let sql = dict("oracle").create_table_sql("emp", SPEC, &TableOptions::default()).unwrap();
    assert_eq!(sql.len(), 3);
    assert!(sql[0].starts_with("CREATE TABLE emp ("));
    assert_eq!(sql[1], "CREATE SEQUENCE SEQ_emp");
    assert!(sql[2].contains("BEFORE INSERT ON emp"));
}

#[test]
fn oracle_replace_drops_the_sequence_once() {
    let options = TableOptions {
        replace: true,
        ..TableOptions::default()
    };
    let sql = dict("oracle").create_table_sql("emp", SPEC, &options).unwrap();
    let drops = sql.iter().filter(|s| s.as_str() == "DROP SEQUENCE SEQ_emp").count();
    assert_eq!(drops, 1, "sequence dropped more than once: {sql:?}");
    assert_eq!(sql[0], "DROP TABLE emp");
    assert_eq!(sql[1], "DROP SEQUENCE SEQ_emp");
    assert!(sql[2].starts_with("CREATE TABLE emp ("));
    assert_eq!(sql[3], "CREATE SEQUENCE SEQ_emp");
}

#[test]
fn sybase_and_sapdb_spell_autoincrement_as_a_default() {
    let sybase = dict("sybase").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert!(sybase[0].contains("DEFAULT AUTOINCREMENT"));
    let sapdb = dict("sapdb").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert!(sapdb[0].contains("DEFAULT SERIAL"));
}

#[test]
fn informix_swaps_the_column_type_for_serial() {
    let sql = dict("informix").create_table_sql("t", SPEC, &TableOptions::default()).unwrap();
    assert!(sql[0].contains("id                       SERIAL"));
}

#[test]
fn doubled_quote_survives_into_the_default() {
    let sql = dict("generic")
        .create_table_sql("t", "note C(40) DEFAULT 'it''s'", &TableOptions::default())
        .unwrap();
    assert!(sql[0].contains("DEFAULT 'it''s'"));
}

#[test]
fn size_and_precision_split_on_dot() {
    let spec = parse_field_spec("price N(7.2)", &Config::default()).unwrap();
    let price = spec.field("price").unwrap();
    assert_eq!(price.ty, TypeSpec::Meta(MetaType::N));
    assert_eq!(price.size, Some(7));
    assert_eq!(price.precision, Some(2));
}

#[test]
fn defdate_renders_the_dialect_function() {
    let mysql = dict("mysql")
        .create_table_sql("t", "created D DEFDATE", &TableOptions::default())
        .unwrap();
    assert!(mysql[0].contains("DEFAULT CURDATE()"));
    let oracle = dict("oracle")
        .create_table_sql("t", "created D DEFDATE", &TableOptions::default())
        .unwrap();
    assert!(oracle[0].contains("DEFAULT TRUNC(SYSDATE)"));
}

#[test]
fn table_options_apply_to_the_matching_dialect_only() {
    let mut dialect_constraints = BTreeMap::new();
    dialect_constraints.insert(
        "mysql".to_string(),
        "FOREIGN KEY (id) REFERENCES other (id)".to_string(),
    );
    let mut dialect_suffix = BTreeMap::new();
    dialect_suffix.insert("mysql".to_string(), "ENGINE=InnoDB".to_string());
    let options = TableOptions {
        constraints: Some("CHECK (price >= 0)".to_string()),
        dialect_constraints,
        dialect_suffix,
        ..TableOptions::default()
    };

    let mysql = dict("mysql").create_table_sql("t", SPEC, &options).unwrap();
    assert!(mysql[0].contains("CHECK (price >= 0)"));
    assert!(mysql[0].contains("FOREIGN KEY (id) REFERENCES other (id)"));
    assert!(mysql[0].ends_with(") ENGINE=InnoDB"));

    let pg = dict("postgres").create_table_sql("t", SPEC, &options).unwrap();
    assert!(pg[0].contains("CHECK (price >= 0)"));
    assert!(!pg[0].contains("FOREIGN KEY"));
    assert!(pg[0].ends_with("\n)"));
}

#[test]
fn index_replace_lifecycle_is_ordered() {
    let options = IndexOptions {
        unique: true,
        replace: true,
        ..IndexOptions::default()
    };
    let sql = dict("postgres").create_index_sql("ix_email", "users", &["email"], &options);
    assert_eq!(
        sql,
        vec![
            "DROP INDEX ix_email",
            "CREATE UNIQUE INDEX ix_email ON users (email)"
        ]
    );
}

#[test]
fn index_column_expressions_keep_their_parens() {
    let sql = dict("oracle").create_index_sql(
        "ix_upper",
        "emp",
        &["UPPER(name)"],
        &IndexOptions::default(),
    );
    assert_eq!(sql, vec!["CREATE INDEX ix_upper ON emp (UPPER(name))"]);
}

#[test]
fn malformed_spec_is_rejected() {
    assert!(dict("mysql")
        .create_table_sql("t", "lonely", &TableOptions::default())
        .is_err());
}
