//! Record of credential ids enrolled from this browser profile.
//!
//! The set is stored as a JSON array of base64url strings under
//! [`KNOWN_CREDENTIALS_KEY`]. Entries are only ever appended; the set has no
//! per-user partitioning.

use serde_json::Value;

use crate::storage::errors::StorageError;
use crate::storage::types::KeyValueStore;
use crate::utils::{base64url_decode, base64url_encode};

pub const KNOWN_CREDENTIALS_KEY: &str = "known-credentials";

pub struct KnownCredentials<S> {
    store: S,
}

impl<S: KeyValueStore> KnownCredentials<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Returns the raw ids of every known credential, in enrollment order.
    ///
    /// Never fails: a missing, unreadable or malformed value reads as an
    /// empty set. Single entries that are not valid base64url are skipped.
    pub fn get_known_credentials(&self) -> Vec<Vec<u8>> {
        self.read_encoded()
            .into_iter()
            .filter_map(|encoded| match base64url_decode(&encoded) {
                Ok(raw_id) => Some(raw_id),
                Err(e) => {
                    tracing::warn!("Skipping undecodable known credential {}: {}", encoded, e);
                    None
                }
            })
            .collect()
    }

    /// Records `raw_id`, keeping the set free of duplicates.
    ///
    /// Storage write failures propagate.
    pub fn add_known_credential(&mut self, raw_id: &[u8]) -> Result<(), StorageError> {
        let mut set: Vec<String> = Vec::new();
        for encoded in self.read_encoded() {
            if !set.contains(&encoded) {
                set.push(encoded);
            }
        }

        let encoded = base64url_encode(raw_id);
        if set.contains(&encoded) {
            tracing::debug!("Credential {} already known", encoded);
        } else {
            tracing::debug!("Adding known credential {}", encoded);
            set.push(encoded);
        }

        let serialized = serde_json::to_string(&set)?;
        self.store.set(KNOWN_CREDENTIALS_KEY, &serialized)
    }

    fn read_encoded(&self) -> Vec<String> {
        let raw = match self.store.get(KNOWN_CREDENTIALS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read known credentials: {}", e);
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring malformed known credentials: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(encoded) => Some(encoded),
                other => {
                    tracing::warn!("Skipping non-string known credential {}", other);
                    None
                }
            })
            .collect()
    }
}
