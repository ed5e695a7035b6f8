use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage::errors::StorageError;

/// Injectable string key-value storage that outlives the process.
///
/// Stands in for the browser profile's `localStorage`. Access is synchronous:
/// the only suspension points of a ceremony are the platform call and the
/// network submission.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    pub(super) entry: HashMap<String, String>,
}

/// A JSON object file on disk holding one string value per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    pub(super) path: PathBuf,
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
