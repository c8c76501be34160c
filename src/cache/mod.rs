//! Local endpoint-to-session cache
//!
//! Remembers the last session used against each server so the next
//! invocation can continue it. The record is only a hint: the server is the
//! authority on whether the session still exists.
//!
//! Storage goes through the [`KeyValueStore`] trait so the medium (flat
//! files, SQLite, memory) can be swapped. There is no locking: two
//! processes resolving against the same endpoint at once may both write,
//! and the last writer wins.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{CacheBackend, CacheConfig};
use crate::endpoint::Endpoint;
use crate::error::Result;
use serde::Serialize;

/// Minimal string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; returns whether it was present
    fn delete(&self, key: &str) -> Result<bool>;

    /// All stored keys, in storage order
    fn list_keys(&self) -> Result<Vec<String>>;
}

/// One cache record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// Server the session belongs to
    pub endpoint: Endpoint,
    /// Last session used against that server
    pub session_id: String,
}

/// Endpoint-keyed view over a [`KeyValueStore`]
pub struct SessionCache {
    store: Box<dyn KeyValueStore>,
}

impl SessionCache {
    /// Wraps a store
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Opens the store selected by configuration
    pub fn open(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(open_store(config)?))
    }

    /// Session recorded for `endpoint`, if any
    pub fn session_for(&self, endpoint: &Endpoint) -> Result<Option<String>> {
        self.store.get(&endpoint.cache_key())
    }

    /// Records `session_id` for `endpoint`, overwriting any previous record
    pub fn record(&self, endpoint: &Endpoint, session_id: &str) -> Result<()> {
        tracing::debug!(endpoint = %endpoint, session = %session_id, "Recording session");
        self.store.put(&endpoint.cache_key(), session_id)
    }

    /// Drops the record for `endpoint`; returns whether one existed
    pub fn forget(&self, endpoint: &Endpoint) -> Result<bool> {
        self.store.delete(&endpoint.cache_key())
    }

    /// Drops every record; returns how many held a session
    ///
    /// Blank or unreadable records are deleted too but not counted, matching
    /// what [`SessionCache::entries`] reports.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for key in self.store.list_keys()? {
            let held = matches!(self.store.get(&key), Ok(Some(_)));
            if self.store.delete(&key)? && held {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Every record whose key parses back into an endpoint
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        for key in self.store.list_keys()? {
            let endpoint = match Endpoint::from_cache_key(&key) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    tracing::warn!(key = %key, "Skipping unreadable cache record: {}", e);
                    continue;
                }
            };
            if let Some(session_id) = self.store.get(&key)? {
                entries.push(CacheEntry {
                    endpoint,
                    session_id,
                });
            }
        }
        Ok(entries)
    }
}

/// Builds the store for the configured backend
///
/// Nothing is created on disk until the first write.
pub fn open_store(config: &CacheConfig) -> Result<Box<dyn KeyValueStore>> {
    match config.backend {
        CacheBackend::Files => Ok(Box::new(FileStore::new(&config.dir))),
        CacheBackend::Sqlite => Ok(Box::new(SqliteStore::new_in_dir(&config.dir))),
    }
}
