//! In-process store.

use crate::{CacheError, KvStore};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A `KvStore` held in memory.
///
/// Every successful `set_raw` is also appended to a write log, so tests can
/// check exactly what was persisted and when. A store built with
/// [`MemoryStore::failing_writes`] rejects every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes and deletes all fail.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw value without recording a write.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        lock(&self.entries).insert(key.into(), value.into());
        self
    }

    /// Every `(key, value)` written so far, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        lock(&self.writes).clone()
    }

    /// Writes made to one key, oldest first.
    pub fn writes_to(&self, key: &str) -> Vec<String> {
        lock(&self.writes)
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn check_writable(&self) -> Result<(), CacheError> {
        if self.fail_writes {
            return Err(CacheError::StoreError("store is read-only".to_string()));
        }
        Ok(())
    }
}

// Poisoning leaves the map intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.check_writable()?;
        lock(&self.entries).insert(key.to_string(), value.to_string());
        lock(&self.writes).push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_writable()?;
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(lock(&self.entries).keys().cloned().collect())
    }
}
