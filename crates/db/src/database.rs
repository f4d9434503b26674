//! PostgreSQL connection and introspection.
//!
//! Responsibilities:
//! - Open a pooled connection from `DbSettings`.
//! - List tables, describe columns, run raw text queries.
//! - Create tables from a `TableModel` when they are missing.
//!
//! Does NOT handle:
//! - Schema design or migrations. DDL comes from the model as-is.
//!
//! Invariants:
//! - Introspection is limited to the `public` schema.
//! - Raw queries go through the simple query protocol, so every value is read back as text.

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row};

use crate::error::{DbError, Result};
use crate::models::{ColumnInfo, QueryRow, Rating, TableModel};
use crate::settings::DbSettings;

pub const DEFAULT_SCHEMA: &str = "public";
const MAX_CONNECTIONS: u32 = 2;

/// An open database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects using `settings`.
    pub async fn connect(settings: &DbSettings) -> Result<Self> {
        let options = settings.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %settings.host,
            port = ?settings.port,
            database = %settings.database,
            "Connected to database"
        );
        Ok(Self { pool })
    }

    /// Names of the base tables in the schema, sorted.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .bind(DEFAULT_SCHEMA)
        .fetch_all(&self.pool)
        .await?;

        tracing::info!(?tables, "Table names");
        Ok(tables)
    }

    /// Columns of `table` in ordinal order.
    ///
    /// # Errors
    ///
    /// `DbError::TableNotFound` if the table has no columns in the schema.
    pub async fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let columns: Vec<ColumnInfo> = sqlx::query_as(
            r#"
            SELECT
                column_name::text AS name,
                data_type::text AS data_type,
                (is_nullable = 'YES') AS nullable,
                column_default::text AS "default"
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(DEFAULT_SCHEMA)
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        if columns.is_empty() {
            return Err(DbError::TableNotFound(table.to_string()));
        }
        tracing::info!(table, columns = ?columns, "Table columns");
        Ok(columns)
    }

    /// Column names of `table` in ordinal order.
    pub async fn table_column_names(&self, table: &str) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .table_columns(table)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        tracing::info!(table, ?names, "Column names");
        Ok(names)
    }

    /// Executes `sql` as-is and returns every row as text.
    pub async fn raw_query(&self, sql: &str) -> Result<Vec<QueryRow>> {
        let rows: Vec<PgRow> = sqlx::raw_sql(sql).fetch_all(&self.pool).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let parsed = text_row(row)?;
            tracing::info!("{parsed}");
            out.push(parsed);
        }
        Ok(out)
    }

    /// Creates the model's table unless it already exists.
    ///
    /// Returns `true` if the table was created.
    pub async fn create_table<M: TableModel>(&self) -> Result<bool> {
        let tables = self.list_tables().await?;
        if tables.iter().any(|t| t == M::TABLE_NAME) {
            tracing::info!(table = M::TABLE_NAME, "table already exists");
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;
        for statement in M::create_statements() {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::info!(table = M::TABLE_NAME, "Created table");
        Ok(true)
    }

    /// Inserts a rating and returns it with its assigned id.
    pub async fn insert_rating(&self, rating: Rating) -> Result<Rating> {
        let stored: Rating =
            sqlx::query_as("INSERT INTO ratings (stars) VALUES ($1) RETURNING id, stars")
                .bind(rating.stars)
                .fetch_one(&self.pool)
                .await?;
        tracing::info!(id = ?stored.id, "Inserted {stored}");
        Ok(stored)
    }

    /// Closes every pooled connection.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Closed database pool");
    }
}

fn text_row(row: &PgRow) -> Result<QueryRow> {
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        // Simple-protocol results arrive in text format regardless of column type.
        let value: Option<String> = row.try_get_unchecked(idx)?;
        values.push((column.name().to_string(), value));
    }
    Ok(QueryRow { values })
}
