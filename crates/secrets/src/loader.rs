//! Environment file loading and secret lookup.
//!
//! Responsibilities:
//! - Parse `KEY=VALUE` environment files.
//! - Locate an environment file and write its entries into a `SecretStore`.
//! - Read a single secret back out of a store.
//!
//! Does NOT handle:
//! - Quoting, escaping, `export` prefixes or variable interpolation. Values are
//!   everything after the first `=`, verbatim.
//!
//! Invariants:
//! - The target name must end with `.env`; this is checked before touching the filesystem.
//! - File values overwrite existing store values, and the last definition in a file wins.
//! - Secret values never appear in logs or error messages.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::constants::{COMMENT_PREFIX, ENV_FILE_SUFFIX};
use crate::error::{Result, SecretsError};
use crate::locator::{DirLevel, locate};
use crate::store::SecretStore;

/// One `KEY=VALUE` line of an environment file.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub key: String,
    pub value: String,
}

impl std::fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEntry")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// What a successful load wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Resolved path of the environment file.
    pub path: PathBuf,
    /// Keys in file order, one per distinct key.
    pub keys: Vec<String>,
}

/// Parses the contents of an environment file.
///
/// Comment lines (`#`), blank lines, lines without `=` and lines with an
/// empty key are skipped. Entries are returned in file order; repeated keys
/// are kept so that applying them in order makes the last one win.
pub fn parse_env_file(content: &str) -> Result<Vec<SecretEntry>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line.starts_with(COMMENT_PREFIX) || line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!(line = line_no, "Skipping environment line without '='");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            tracing::warn!(line = line_no, "Skipping environment line with an empty key");
            continue;
        }
        if key.contains('\0') || value.contains('\0') {
            return Err(SecretsError::InvalidFormat(format!(
                "NUL byte in environment file at line {line_no}"
            )));
        }

        entries.push(SecretEntry {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(entries)
}

/// Locates `target` around `source`, reads it and writes every entry into `store`.
///
/// # Errors
///
/// - `InvalidFormat` if `target` does not end with `.env` or the file is not valid UTF-8.
/// - Any error from [`locate`], unchanged.
/// - `Io` if the resolved file cannot be read.
pub fn load_secrets_from_file<S>(
    store: &mut S,
    target: &str,
    source: impl AsRef<Path>,
    dir_level: Option<DirLevel>,
) -> Result<LoadReport>
where
    S: SecretStore + ?Sized,
{
    ensure_env_suffix(target)?;
    let path = locate(target, source, dir_level)?;
    let entries = read_env_file(&path)?;
    let keys = apply_entries(store, &entries);

    tracing::info!(path = %path.display(), count = keys.len(), "Loaded secrets");
    Ok(LoadReport { path, keys })
}

/// Reads and parses an environment file at a known path.
pub fn read_env_file(path: &Path) -> Result<Vec<SecretEntry>> {
    let bytes = std::fs::read(path).map_err(|e| SecretsError::io(path, e))?;
    let content = String::from_utf8(bytes).map_err(|e| {
        SecretsError::InvalidFormat(format!(
            "{} is not valid UTF-8 (byte {})",
            path.display(),
            e.utf8_error().valid_up_to()
        ))
    })?;
    parse_env_file(&content)
}

/// Returns the value of `name`, failing if it is absent or empty.
pub fn get_secret<S>(store: &S, name: &str) -> Result<SecretString>
where
    S: SecretStore + ?Sized,
{
    match store.get(name) {
        Some(value) if !value.is_empty() => Ok(SecretString::new(value.into())),
        _ => Err(SecretsError::NotFound(format!("Secret {name}"))),
    }
}

pub(crate) fn ensure_env_suffix(target: &str) -> Result<()> {
    if target.ends_with(ENV_FILE_SUFFIX) {
        Ok(())
    } else {
        Err(SecretsError::InvalidFormat(format!(
            "File name must end with {ENV_FILE_SUFFIX} (got {target})"
        )))
    }
}

fn apply_entries<S>(store: &mut S, entries: &[SecretEntry]) -> Vec<String>
where
    S: SecretStore + ?Sized,
{
    let mut keys: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        store.set(&entry.key, &entry.value);
        if !keys.contains(&entry.key) {
            keys.push(entry.key.clone());
        }
    }
    keys
}
