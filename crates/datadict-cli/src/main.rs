//! datadict CLI
//!
//! Generates dialect-specific DDL from field specs on the command line.
//! Statements are printed, never executed; pipe them into the database
//! client of your choice.

use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use datadict_core::{Config, DataDict, IndexOptions, RawField, TableOptions};

/// Portable DDL generation from a compact field-spec language.
#[derive(Parser)]
#[command(name = "datadict")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target dialect: mysql, postgres, sqlite, mssql, oracle, db2,
    /// informix, sybase, sapdb, or generic. Driver aliases work too.
    #[arg(short, long, env = "DATADICT_DIALECT", default_value = "generic")]
    dialect: String,

    /// Schema prefix applied to table names.
    #[arg(short, long)]
    schema: Option<String>,

    /// Fail on spec problems that would otherwise be logged and skipped.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit CREATE TABLE statements for a field spec.
    CreateTable {
        /// Table name.
        table: String,

        /// Field spec, e.g. "id I KEY AUTO, name C(60) NOTNULL".
        spec: String,

        /// Read the spec as a JSON array of column objects.
        #[arg(long)]
        json: bool,

        /// Drop an existing table first.
        #[arg(long)]
        replace: bool,

        /// Only emit the drop statements.
        #[arg(long)]
        drop: bool,

        /// Constraint text placed inside the column list.
        #[arg(long)]
        constraints: Option<String>,
    },

    /// Emit ALTER TABLE statements adding columns.
    AddColumn {
        table: String,
        spec: String,

        /// Read the spec as a JSON array of column objects.
        #[arg(long)]
        json: bool,
    },

    /// Emit ALTER TABLE statements altering columns.
    AlterColumn {
        table: String,
        spec: String,

        /// Read the spec as a JSON array of column objects.
        #[arg(long)]
        json: bool,
    },

    /// Emit ALTER TABLE statements dropping columns.
    DropColumn {
        table: String,
        columns: Vec<String>,
    },

    /// Emit a column rename.
    RenameColumn {
        table: String,
        old: String,
        new: String,

        /// Field spec restating the column, for dialects that need it.
        #[arg(long)]
        definition: Option<String>,
    },

    /// Emit a table rename.
    RenameTable { from: String, to: String },

    /// Emit a DROP TABLE statement.
    DropTable { table: String },

    /// Emit CREATE INDEX statements.
    CreateIndex {
        index: String,
        table: String,
        columns: Vec<String>,

        /// UNIQUE index.
        #[arg(long)]
        unique: bool,

        /// Drop an existing index of the same name first.
        #[arg(long)]
        replace: bool,
    },

    /// Emit a DROP INDEX statement.
    DropIndex { index: String, table: String },

    /// Emit a CREATE DATABASE statement.
    CreateDatabase {
        name: String,

        /// Option text appended for the active dialect, e.g. a character
        /// set clause.
        #[arg(long)]
        options: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config {
        strict: cli.strict,
        schema: cli.schema.clone(),
        ..Config::default()
    };
    let dict = DataDict::new(&cli.dialect, config)?;

    let sql = match cli.command {
        Commands::CreateTable {
            table,
            spec,
            json,
            replace,
            drop,
            constraints,
        } => {
            let options = TableOptions {
                replace,
                drop,
                constraints,
                ..TableOptions::default()
            };
            if json {
                let fields: Vec<RawField> = serde_json::from_str(&spec)?;
                dict.create_table_sql(&table, &fields, &options)?
            } else {
                dict.create_table_sql(&table, spec.as_str(), &options)?
            }
        }
        Commands::AddColumn { table, spec, json } => {
            if json {
                let fields: Vec<RawField> = serde_json::from_str(&spec)?;
                dict.add_column_sql(&table, &fields)?
            } else {
                dict.add_column_sql(&table, spec.as_str())?
            }
        }
        Commands::AlterColumn { table, spec, json } => {
            if json {
                let fields: Vec<RawField> = serde_json::from_str(&spec)?;
                dict.alter_column_sql(&table, &fields)?
            } else {
                dict.alter_column_sql(&table, spec.as_str())?
            }
        }
        Commands::DropColumn { table, columns } => {
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            dict.drop_column_sql(&table, &columns)
        }
        Commands::RenameColumn {
            table,
            old,
            new,
            definition,
        } => dict.rename_column_sql(&table, &old, &new, definition.as_deref())?,
        Commands::RenameTable { from, to } => dict.rename_table_sql(&from, &to),
        Commands::DropTable { table } => dict.drop_table_sql(&table),
        Commands::CreateIndex {
            index,
            table,
            columns,
            unique,
            replace,
        } => {
            let options = IndexOptions {
                unique,
                replace,
                ..IndexOptions::default()
            };
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            dict.create_index_sql(&index, &table, &columns, &options)
        }
        Commands::DropIndex { index, table } => dict.drop_index_sql(&index, &table),
        Commands::CreateDatabase { name, options } => {
            let mut option_map = BTreeMap::new();
            if let Some(text) = options {
                option_map.insert(dict.dialect().name().to_string(), text);
            }
            dict.create_database_sql(&name, &option_map)
        }
    };

    for statement in &sql {
        println!("{statement};");
    }
    Ok(())
}
