mod errors;
mod file;
mod known_credentials;
mod memory;
mod types;

pub use errors::StorageError;
pub use known_credentials::{KNOWN_CREDENTIALS_KEY, KnownCredentials};
pub use types::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
