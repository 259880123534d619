//! Session-scoped key/value storage.
//!
//! The storage backend is pluggable; [`Session`] layers typed JSON access
//! on top of it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Raw string storage, e.g. a browser's `sessionStorage` or a file.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-process storage; lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Typed view over a [`SessionStorage`].
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn SessionStorage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(MemorySessionStorage::new()))
    }
}

impl Session {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Read and decode a value.
    ///
    /// A value that no longer decodes is removed and treated as absent.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "dropping undecodable session value");
                self.storage.remove(key);
                None
            }
        }
    }

    /// Encode and store a value.
    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.storage.set(key, raw),
            Err(e) => warn!(key, error = %e, "failed to encode session value"),
        }
    }

    pub fn remove(&self, key: &str) {
        self.storage.remove(key);
    }

    /// Read, decode and remove a value in one step.
    #[must_use]
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key);
        self.storage.remove(key);
        value
    }
}
