//! Error types for locating and loading secrets.
//!
//! Invariants:
//! - Error messages name files, directories, keys and line numbers, never secret values.
//! - Failures are surfaced immediately; nothing here retries or recovers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the file locator, the secrets loader and the compose injector.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// A required input was missing or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A file name or file content did not have the expected shape.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The target file exists in more than one candidate directory.
    #[error("File {file} exists in multiple directories: {}", display_paths(.candidates))]
    AmbiguousFile {
        file: String,
        candidates: Vec<PathBuf>,
    },

    /// A file or secret could not be found.
    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse compose document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SecretsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SecretsError::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = SecretsError> = std::result::Result<T, E>;
