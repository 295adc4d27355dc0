//! Storage layer for tripplanner.
//!
//! Every collection lives as one JSON array under one key of a synchronous
//! string key-value store. [`KeyValueStore`] abstracts the backend so that
//! tests can run against [`MemoryStore`] while the CLI persists to
//! [`SqliteStore`]. [`Storage`] is the adapter the entity stores talk to.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StorageStats};

/// A synchronous string key-value store.
///
/// Writes overwrite the previous value for the key in a single call.
/// There are no transactions and the last writer wins.
pub trait KeyValueStore: fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Collection-level adapter over a shared [`KeyValueStore`].
///
/// Cloning is cheap; all clones address the same backend.
#[derive(Debug, Clone)]
pub struct Storage {
    backend: Rc<dyn KeyValueStore>,
}

impl Storage {
    /// Wrap a backend.
    #[must_use]
    pub fn new<S: KeyValueStore + 'static>(backend: S) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Wrap a backend that the caller keeps a handle to.
    #[must_use]
    pub fn from_shared(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Create a storage adapter over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Load the collection stored under `key`.
    ///
    /// A missing key, malformed content or a failing backend read all yield
    /// an empty collection; this never returns an error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Failed to read collection {}: {}", key, err);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!("Loaded {} records from {}", items.len(), key);
                items
            }
            Err(err) => {
                warn!("Discarding unreadable collection {}: {}", key, err);
                Vec::new()
            }
        }
    }

    /// Serialize `items` and overwrite the collection stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(key, &raw)?;
        debug!("Saved {} records to {}", items.len(), key);
        Ok(())
    }
}
