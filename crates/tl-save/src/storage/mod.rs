//! Storage backends.
//!
//! The manager talks to storage only through [`SaveStorage`]. Two backends
//! exist: [`FileStorage`] writes one JSON file per key, and [`MemoryStorage`]
//! keeps everything in a map and can simulate failures.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors a storage backend can report.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is out of space.
    #[error("storage quota exceeded writing '{key}'")]
    QuotaExceeded {
        /// Key being written.
        key: String,
    },

    /// The key cannot be used by this backend.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The backend is not reachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-value store holding serialized saves.
pub trait SaveStorage {
    /// Read the value under `key`; `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// On error the previous value must still be readable.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Whether a value exists under `key`.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.read(key)?.is_some())
    }
}
