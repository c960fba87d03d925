//! Local key-value storage for crosscert.
//!
//! Every piece of portal state lives in a flat string-to-string map, the same
//! shape as a browser's local storage. Consumers receive a [`LocalStorage`]
//! implementation instead of reaching for a global, so tests can hand them a
//! [`MemoryStorage`] and the CLI can hand them a [`SqliteStorage`].

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::sync::Arc;

use crate::error::Result;

pub use memory::MemoryStorage;
pub use sqlite::{SqliteStorage, StorageStats};

/// A durable, synchronous string key-value store.
///
/// Writes overwrite; a `get` after a successful `set` observes the new value.
pub trait LocalStorage: Send + Sync {
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

    /// Remove `key`. Returns `true` if a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<T: LocalStorage + ?Sized> LocalStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<T: LocalStorage + ?Sized> LocalStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<T: LocalStorage + ?Sized> LocalStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(storage: &dyn LocalStorage) {
        assert_eq!(storage.get("a").unwrap(), None);
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.set("a", "3").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
        assert!(storage.remove("a").unwrap());
        assert!(!storage.remove("a").unwrap());
        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_memory_backend_contract() {
        exercise(&MemoryStorage::new());
    }

    #[test]
    fn test_sqlite_backend_contract() {
        exercise(&SqliteStorage::open_in_memory().unwrap());
    }

    #[test]
    fn test_shared_backend_through_arc() {
        let shared = Arc::new(MemoryStorage::new());
        let writer = Arc::clone(&shared);
        writer.set("k", "v").unwrap();
        assert_eq!(shared.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_boxed_trait_object() {
        let boxed: Box<dyn LocalStorage> = Box::new(MemoryStorage::new());
        boxed.set("k", "v").unwrap();
        assert_eq!(boxed.get("k").unwrap().as_deref(), Some("v"));
    }
}
