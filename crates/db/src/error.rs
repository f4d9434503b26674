//! Error types for the database access layer.

use opskit_secrets::SecretsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Connection settings could not be read from the secret store.
    #[error(transparent)]
    Secrets(#[from] SecretsError),

    #[error("Invalid database address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Unsupported database driver '{0}' (expected postgresql)")]
    UnsupportedDriver(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),
}

pub type Result<T, E = DbError> = std::result::Result<T, E>;
