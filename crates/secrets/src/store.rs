//! Key/value stores that loaded secrets are written into.
//!
//! Responsibilities:
//! - Define the `SecretStore` seam used by the loader, the accessor and the compose injector.
//! - Provide `ProcessEnv`, backed by the real process environment.
//! - Provide `MemoryStore`, an in-memory map for hermetic tests and dry runs.
//!
//! Does NOT handle:
//! - Parsing environment files (see `loader`).
//!
//! Invariants:
//! - `ProcessEnv` is the only type in the workspace that mutates the process environment.
//! - Setting a key always overwrites its previous value.

use std::collections::BTreeMap;

/// A mutable mapping from secret name to value.
pub trait SecretStore {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Removes `key` if present.
    fn remove(&mut self, key: &str);

    /// Removes every key in `keys`.
    fn unload<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        Self: Sized,
    {
        for key in keys {
            self.remove(key.as_ref());
        }
    }
}

/// The process environment.
///
/// State lives for the whole process and is never cleared implicitly.
/// Callers running in parallel (tests) must serialize access themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl SecretStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: the opskit binary runs on a current-thread runtime and spawns
        // no threads of its own, so nothing reads the environment concurrently.
        // Tests that use `ProcessEnv` are `#[serial]`.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        // SAFETY: see `set`.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// An in-memory store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
