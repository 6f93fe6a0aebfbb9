//! Key-value persistence for the history ledger
//!
//! The browser build backs this with `localStorage`; everything else uses
//! [`MemoryStore`].

use std::collections::HashMap;

use thiserror::Error;

use crate::core::history::History;

/// Errors raised by a key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store is not available (private mode, quota, no window)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected
    #[error("Storage write failed for key `{key}`: {message}")]
    Write {
        /// Key being written
        key: String,
        /// Backend message
        message: String,
    },

    /// The value could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal synchronous string key-value store
pub trait KeyValueStore: std::fmt::Debug {
    /// Reads a value
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one key
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    /// Returns true if the key is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Persists a [`History`] under a fixed key
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Wraps a store
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the history lives under
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying store
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Loads the persisted history
    ///
    /// A missing key, an unreadable store and corrupted JSON all yield an
    /// empty history.
    #[must_use]
    pub fn load(&self, capacity: usize) -> History {
        match self.store.get(&self.key) {
            Ok(Some(json)) => History::from_json_lossy(&json, capacity),
            Ok(None) => History::with_capacity(capacity),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "history store unreadable");
                History::with_capacity(capacity)
            }
        }
    }

    /// Writes the whole history
    pub fn save(&mut self, history: &History) -> Result<(), StorageError> {
        let json = history.to_json()?;
        self.store.set(&self.key, &json)
    }

    /// Removes the persisted history
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}
