//! Narrow key-value storage abstraction
//!
//! The browser's `localStorage` is the production backend. Everything that
//! reads or writes session state goes through [`KeyValueStore`] so it can be
//! exercised against [`MemoryStore`].

use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;

/// String-keyed durable storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Memory store that refuses writes to one key
#[cfg(test)]
pub(crate) struct RejectingStore {
    inner: MemoryStore,
    rejected: &'static str,
}

#[cfg(test)]
impl RejectingStore {
    pub fn new(rejected: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            rejected,
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[cfg(test)]
impl KeyValueStore for RejectingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.rejected {
            return Err(StorageError::write_rejected(key, "QuotaExceededError"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("user", "{}").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
        assert!(store.contains("user"));

        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn removing_a_missing_key_is_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.remove("access").is_ok());
    }
}
