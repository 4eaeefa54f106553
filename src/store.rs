//! The key-value store that parsing reads from and writes into.
//!
//! `ProcessEnv` is the real process environment; `MemoryStore` is an
//! in-memory stand-in for embedding and tests.

use std::collections::HashMap;
use std::env;

/// Why a store refused a key or value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("key contains '=' or a NUL byte")]
    InvalidKey,
    #[error("value contains a NUL byte")]
    InvalidValue,
}

/// Externally owned key-value store consulted and mutated by the parser.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The environment of the current process.
///
/// Writes go through `std::env::set_var`, so callers must not parse
/// into it from several threads at once. Keys containing `=` (written
/// `\=` in a file) are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Store for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn has(&self, key: &str) -> bool {
        !key.is_empty() && !key.contains(['=', '\0']) && env::var_os(key).is_some()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return Err(StoreError::InvalidKey);
        }
        if value.contains('\0') {
            return Err(StoreError::InvalidValue);
        }
        // SAFETY: parsing is single-threaded and `ProcessEnv` documents
        // that concurrent writers must be serialized by the caller.
        unsafe { env::set_var(key, value) };
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    vars: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn has(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
