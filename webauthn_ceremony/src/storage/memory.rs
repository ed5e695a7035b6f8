use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::{InMemoryKeyValueStore, KeyValueStore};

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory key-value store");
        Self {
            entry: HashMap::new(),
        }
    }

    /// Seed a store with an existing value, e.g. a profile written by an older session.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entry.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
