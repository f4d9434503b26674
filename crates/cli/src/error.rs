//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `SecretsError` and `DbError` variants to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-5 are reserved for specific error categories.

use opskit_db::DbError;
use opskit_secrets::SecretsError;

/// Structured exit codes for opskit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure (I/O, YAML).
    GeneralError = 1,

    /// Invalid argument or format - missing origin, wrong file suffix, bad address.
    ///
    /// Scripts should fix the input and not retry.
    InvalidInput = 2,

    /// The target file exists in more than one candidate directory.
    ///
    /// Scripts should pass `--dir-level`.
    AmbiguousFile = 3,

    /// File, secret or table not found.
    NotFound = 4,

    /// Database connection or query failure.
    DatabaseError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&SecretsError> for ExitCode {
    fn from(err: &SecretsError) -> Self {
        match err {
            SecretsError::InvalidArgument(_) | SecretsError::InvalidFormat(_) => {
                ExitCode::InvalidInput
            }
            SecretsError::AmbiguousFile { .. } => ExitCode::AmbiguousFile,
            SecretsError::NotFound(_) => ExitCode::NotFound,
            SecretsError::Io { .. } | SecretsError::Yaml(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&DbError> for ExitCode {
    fn from(err: &DbError) -> Self {
        match err {
            DbError::Secrets(inner) => Self::from(inner),
            DbError::InvalidAddress { .. } | DbError::UnsupportedDriver(_) => {
                ExitCode::InvalidInput
            }
            DbError::TableNotFound(_) => ExitCode::NotFound,
            DbError::Sql(_) => ExitCode::DatabaseError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<DbError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<SecretsError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }
}
