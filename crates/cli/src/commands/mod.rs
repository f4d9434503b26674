//! CLI command implementations.

pub mod compose;
pub mod locate;
pub mod secrets;
pub mod sql;

use std::path::PathBuf;

use opskit_secrets::DirLevel;

/// Where file lookups start, shared by every command.
#[derive(Debug, Clone)]
pub struct Origin {
    pub path: PathBuf,
    pub dir_level: Option<DirLevel>,
}
