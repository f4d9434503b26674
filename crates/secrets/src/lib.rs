//! Secret file discovery and loading for opskit.
//!
//! This crate finds a named file next to (or up to two directories above) an
//! origin file, loads `KEY=VALUE` environment files into an injectable
//! key/value store, and injects those secrets into docker-compose files.

pub mod compose;
pub mod constants;
mod error;
pub mod loader;
pub mod locator;
pub mod store;

pub use compose::{
    ComposeFill, ComposeOutcome, ComposeTargets, ServiceFill, fill_compose_file,
    fill_compose_secrets,
};
pub use error::{Result, SecretsError};
pub use loader::{
    LoadReport, SecretEntry, get_secret, load_secrets_from_file, parse_env_file, read_env_file,
};
pub use locator::{DirLevel, candidate_dirs, locate};
pub use store::{MemoryStore, ProcessEnv, SecretStore};
