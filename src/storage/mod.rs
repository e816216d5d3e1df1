//! Key/value persistence for trial state
//!
//! The trial manager never touches the filesystem directly. It talks to a
//! [`KeyValueStore`], which maps string keys to serialized JSON strings:
//! - [`MemoryStore`] keeps everything in-process (tests, embedding)
//! - [`FileStore`] keeps one JSON file per key in a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by a key/value store backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Synchronous string key/value store scoped to one local principal
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if unset
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> StorageResult<()>;
}

/// Outcome of reading a typed value from a store
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Nothing stored under the key
    Absent,
    /// Something is stored but it could not be read or decoded
    Malformed(String),
    /// Decoded value
    Present(T),
}

/// Read and decode a JSON value from the store
///
/// A backend read failure is reported as [`Lookup::Malformed`]: callers treat
/// both the same way and the reason is kept for diagnostics.
pub fn load_json<T, S>(store: &S, key: &str) -> Lookup<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(None) => Lookup::Absent,
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => Lookup::Present(value),
            Err(e) => Lookup::Malformed(format!("invalid JSON under '{}': {}", key, e)),
        },
        Err(e) => Lookup::Malformed(format!("failed to read '{}': {}", key, e)),
    }
}
