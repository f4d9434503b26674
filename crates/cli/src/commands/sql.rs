//! `opskit sql`: database introspection and raw queries.
//!
//! Responsibilities:
//! - Load database credentials from the environment file.
//! - Connect, run one subcommand, print its results, close the pool.
//!
//! Does NOT handle:
//! - Connection pooling policy or statement logging (see `opskit-db`).

use anyhow::{Context, Result};
use opskit_db::{Database, DbSettings, Rating};
use opskit_secrets::{ProcessEnv, load_secrets_from_file};
use serde::Serialize;

use super::Origin;
use crate::args::{OutputFormat, SqlCommand};

/// Arguments shared by every `sql` subcommand.
#[derive(Debug)]
pub struct SqlArgs {
    pub env_file: String,
    pub database: String,
    pub echo: bool,
    pub output: OutputFormat,
}

pub async fn run(origin: &Origin, args: SqlArgs, command: SqlCommand) -> Result<()> {
    let mut env = ProcessEnv;
    load_secrets_from_file(&mut env, &args.env_file, &origin.path, origin.dir_level)
        .with_context(|| format!("Failed to load secrets from {}", args.env_file))?;

    let settings = DbSettings::from_secrets(&env, args.database)?.with_debug(args.echo);
    let db = Database::connect(&settings)
        .await
        .context("Failed to connect to database")?;

    let result = execute(&db, command, args.output).await;
    db.close().await;
    result
}

async fn execute(db: &Database, command: SqlCommand, output: OutputFormat) -> Result<()> {
    match command {
        SqlCommand::Tables => emit_list(output, &db.list_tables().await?)?,
        SqlCommand::Columns { table } => {
            let columns = db.table_columns(&table).await?;
            match output {
                OutputFormat::Json => emit_json(&columns)?,
                OutputFormat::Text => {
                    for c in &columns {
                        let null = if c.nullable { "NULL" } else { "NOT NULL" };
                        match &c.default {
                            Some(default) => {
                                println!("{}\t{}\t{}\tDEFAULT {}", c.name, c.data_type, null, default)
                            }
                            None => println!("{}\t{}\t{}", c.name, c.data_type, null),
                        }
                    }
                }
            }
        }
        SqlCommand::ColumnNames { table } => {
            emit_list(output, &db.table_column_names(&table).await?)?
        }
        SqlCommand::Query { sql } => emit_rows(output, &db.raw_query(&sql).await?)?,
        SqlCommand::CreateRatings => {
            let created = db.create_table::<Rating>().await?;
            println!("{}", if created { "created" } else { "exists" });
        }
        SqlCommand::Rate { stars } => {
            let stored = db.insert_rating(Rating::new(stars)).await?;
            match stored.id {
                Some(id) => println!("{id}\t{stored}"),
                None => println!("{stored}"),
            }
        }
        SqlCommand::Demo { table, limit } => {
            let rows = db.raw_query(&demo_query(limit)).await?;
            emit_rows(output, &rows)?;
            println!();
            emit_list(output, &db.table_column_names(&table).await?)?;
            println!();
            emit_list(output, &db.list_tables().await?)?;
        }
    }
    Ok(())
}

/// Latest payments per customer from the DVD rental sample database.
fn demo_query(limit: u32) -> String {
    format!(
        "SELECT DISTINCT payment_id, customer.customer_id, first_name \
         FROM customer \
         INNER JOIN payment ON customer.customer_id = payment.customer_id \
         ORDER BY customer.customer_id DESC \
         LIMIT {limit};"
    )
}

fn emit_list(output: OutputFormat, items: &[String]) -> Result<()> {
    match output {
        OutputFormat::Json => emit_json(&items),
        OutputFormat::Text => {
            for item in items {
                println!("{item}");
            }
            Ok(())
        }
    }
}

fn emit_rows(output: OutputFormat, rows: &[opskit_db::QueryRow]) -> Result<()> {
    match output {
        OutputFormat::Json => emit_json(&rows),
        OutputFormat::Text => {
            for row in rows {
                println!("{row}");
            }
            Ok(())
        }
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
