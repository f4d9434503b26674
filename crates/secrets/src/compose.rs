//! Secret injection into docker-compose deployment descriptors.
//!
//! Responsibilities:
//! - Rewrite each service's `environment` block with values from a `SecretStore`.
//! - Locate the environment file and compose file, load secrets, and save the result.
//!
//! Does NOT handle:
//! - Preserving YAML comments, anchors or key formatting. The document is re-rendered.
//!
//! Invariants:
//! - Every key a service references must be defined by the environment file and
//!   resolvable in the store; otherwise nothing is written.
//! - List-shaped environments stay lists and mapping-shaped ones stay mappings,
//!   in their original order.
//! - The compose file is replaced atomically (temp file + rename) and keeps its permissions.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde_yaml::{Mapping, Value};
use tempfile::NamedTempFile;

use crate::error::{Result, SecretsError};
use crate::loader::{LoadReport, get_secret, load_secrets_from_file};
use crate::locator::{DirLevel, locate};
use crate::store::SecretStore;

/// Keys rewritten in one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFill {
    pub service: String,
    pub keys: Vec<String>,
}

/// A rewritten compose document.
#[derive(Debug, Clone)]
pub struct ComposeFill {
    /// Rendered YAML. Contains secret values.
    pub document: String,
    /// Services that had an environment block, in document order.
    pub services: Vec<ServiceFill>,
}

/// Files involved in a compose rewrite.
#[derive(Debug, Clone)]
pub struct ComposeTargets<'a> {
    /// Name of the environment file, e.g. `creds.env`.
    pub env_file: &'a str,
    /// Name of the compose file, e.g. `docker-compose.yml`.
    pub compose_file: &'a str,
    /// Origin file used to derive the candidate directories.
    pub source: &'a Path,
    /// Level applied to both lookups.
    pub dir_level: Option<DirLevel>,
}

/// Result of [`fill_compose_file`].
#[derive(Debug)]
pub struct ComposeOutcome {
    pub compose_path: PathBuf,
    pub env: LoadReport,
    pub fill: ComposeFill,
    /// False for dry runs.
    pub written: bool,
}

/// Rewrites every service environment in `compose` with secret values.
///
/// `defined_keys` are the keys the environment file defines. A key the
/// document references that is not among them, or that the store cannot
/// resolve, fails the whole operation with `NotFound`.
pub fn fill_compose_secrets<S>(
    store: &S,
    defined_keys: &[String],
    compose: &str,
) -> Result<ComposeFill>
where
    S: SecretStore + ?Sized,
{
    let mut doc: Value = serde_yaml::from_str(compose)?;

    let services = doc
        .get_mut("services")
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| {
            SecretsError::InvalidFormat("compose document has no services mapping".to_string())
        })?;

    let mut filled = Vec::new();
    for (name, service) in services.iter_mut() {
        let service_name = name
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{name:?}"));

        let Some(environment) = service.get_mut("environment") else {
            continue;
        };

        let keys = match environment {
            Value::Null => continue,
            Value::Sequence(items) => {
                fill_list(store, defined_keys, &service_name, items)?
            }
            Value::Mapping(map) => fill_mapping(store, defined_keys, &service_name, map)?,
            _ => {
                return Err(SecretsError::InvalidFormat(format!(
                    "environment of service {service_name} must be a list or a mapping"
                )));
            }
        };

        tracing::debug!(service = %service_name, count = keys.len(), "Filled service environment");
        filled.push(ServiceFill {
            service: service_name,
            keys,
        });
    }

    Ok(ComposeFill {
        document: serde_yaml::to_string(&doc)?,
        services: filled,
    })
}

fn fill_list<S>(
    store: &S,
    defined_keys: &[String],
    service: &str,
    items: &mut [Value],
) -> Result<Vec<String>>
where
    S: SecretStore + ?Sized,
{
    let mut keys = Vec::with_capacity(items.len());
    for item in items.iter_mut() {
        let entry = item.as_str().ok_or_else(|| {
            SecretsError::InvalidFormat(format!(
                "environment entries of service {service} must be strings"
            ))
        })?;
        let key = entry
            .split_once('=')
            .map_or(entry, |(key, _)| key)
            .trim()
            .to_string();

        let value = resolve(store, defined_keys, service, &key)?;
        *item = Value::String(format!("{key}={value}"));
        keys.push(key);
    }
    Ok(keys)
}

fn fill_mapping<S>(
    store: &S,
    defined_keys: &[String],
    service: &str,
    map: &mut Mapping,
) -> Result<Vec<String>>
where
    S: SecretStore + ?Sized,
{
    let mut keys = Vec::with_capacity(map.len());
    for (key, value) in map.iter_mut() {
        let key = key.as_str().ok_or_else(|| {
            SecretsError::InvalidFormat(format!(
                "environment keys of service {service} must be strings"
            ))
        })?;

        *value = Value::String(resolve(store, defined_keys, service, key)?);
        keys.push(key.to_string());
    }
    Ok(keys)
}

fn resolve<S>(store: &S, defined_keys: &[String], service: &str, key: &str) -> Result<String>
where
    S: SecretStore + ?Sized,
{
    if !defined_keys.iter().any(|k| k == key) {
        return Err(SecretsError::NotFound(format!(
            "Secret {key} (referenced by service {service}) in environment file"
        )));
    }
    Ok(get_secret(store, key)?.expose_secret().to_string())
}

/// Locates the environment and compose files, loads secrets into `store`,
/// and rewrites the compose file in place unless `dry_run` is set.
pub fn fill_compose_file<S>(
    store: &mut S,
    targets: &ComposeTargets<'_>,
    dry_run: bool,
) -> Result<ComposeOutcome>
where
    S: SecretStore + ?Sized,
{
    let compose_path = locate(targets.compose_file, targets.source, targets.dir_level)?;
    let env = load_secrets_from_file(store, targets.env_file, targets.source, targets.dir_level)?;

    let compose = std::fs::read_to_string(&compose_path)
        .map_err(|e| SecretsError::io(&compose_path, e))?;
    let fill = fill_compose_secrets(store, &env.keys, &compose)?;

    if !dry_run {
        atomic_write(&compose_path, &fill.document)?;
        tracing::info!(
            path = %compose_path.display(),
            services = fill.services.len(),
            "Wrote compose secrets"
        );
    }

    Ok(ComposeOutcome {
        compose_path,
        env,
        fill,
        written: !dry_run,
    })
}

/// Replaces `path` with `content` through a uniquely named sibling temp file,
/// keeping the original file's permissions.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path)
        .map_err(|e| SecretsError::io(path, e))?
        .permissions();

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| SecretsError::io(dir, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().set_permissions(permissions))
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| SecretsError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| SecretsError::io(path, e.error))?;
    Ok(())
}
