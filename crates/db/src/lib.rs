//! PostgreSQL access layer for opskit.
//!
//! Connection settings come from the secret store (`POSTGRES_USER`,
//! `POSTGRES_PASSWORD`, `POSTGRES_ADDRESS`); the `Database` handle exposes
//! table listing, column introspection and raw text queries.

mod database;
mod error;
pub mod models;
pub mod settings;

pub use database::{DEFAULT_SCHEMA, Database};
pub use error::{DbError, Result};
pub use models::{ColumnInfo, QueryRow, Rating, TableModel};
pub use settings::{DEFAULT_DATABASE, DbSettings, parse_address};
