//! Key-value store trait with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// A string-keyed store of string values.
///
/// Implementors provide the raw operations; typed access through JSON comes
/// for free with [`KvStore::get`] and [`KvStore::set`].
pub trait KvStore {
    /// Get the raw stored value. Returns `None` if the key doesn't exist.
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a raw value, replacing any previous one.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Get all keys in the store.
    fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Get a value and deserialize it from JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mobi_cache::{KvStore, MemoryStore};
    ///
    /// let store = MemoryStore::new();
    /// let missing: Option<Vec<String>> = store.get("cart").unwrap();
    /// assert!(missing.is_none());
    /// ```
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize a value to JSON and store it.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set_raw(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

/// Helper to build store keys with namespacing.
///
/// # Example
///
/// ```rust
/// use mobi_cache::cache_key;
///
/// let user_id = "user123";
/// assert_eq!(cache_key!("cart", user_id), "cart:user123");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        quantity: i64,
    }

    #[test]
    fn test_typed_round_trip_through_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref
            .set("cart", &vec![Line { id: "p1".into(), quantity: 2 }])
            .unwrap();

        let lines: Vec<Line> = store.get("cart").unwrap().unwrap();
        assert_eq!(lines[0].quantity, 2);
        assert!(store.exists("cart").unwrap());
    }

    #[test]
    fn test_malformed_value() {
        let store = MemoryStore::new();
        store.set_raw("cart", "{not json").unwrap();

        let err = store.get::<Vec<Line>>("cart").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("wishlist", "u1", 2), "wishlist:u1:2");
    }
}
