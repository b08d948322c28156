use std::collections::{HashMap, HashSet};

use super::{SaveStorage, StorageError};

/// In-memory storage with optional quota and failure injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    quota: Option<usize>,
    fail_next_write: Option<String>,
    corrupt_next_write: Option<String>,
    unreadable: HashSet<String>,
    writes: usize,
}

impl MemoryStorage {
    /// Empty storage with no quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total stored bytes; writes beyond it fail with
    /// [`StorageError::QuotaExceeded`].
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Make the next write to `key` fail with a quota error, leaving the
    /// stored value intact.
    pub fn fail_next_write(&mut self, key: impl Into<String>) {
        self.fail_next_write = Some(key.into());
    }

    /// Make the next write to `key` store truncated bytes while reporting
    /// success.
    pub fn corrupt_next_write(&mut self, key: impl Into<String>) {
        self.corrupt_next_write = Some(key.into());
    }

    /// Make reads of `key` fail until [`clear_read_failures`](Self::clear_read_failures).
    pub fn fail_reads_for(&mut self, key: impl Into<String>) {
        self.unreadable.insert(key.into());
    }

    /// Stop failing reads.
    pub fn clear_read_failures(&mut self) {
        self.unreadable.clear();
    }

    /// Put a raw value in place, bypassing quota and failure injection.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// The raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl SaveStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unreadable.contains(key) {
            return Err(StorageError::Unavailable(format!("read of '{key}' failed")));
        }
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if take_if_key(&mut self.fail_next_write, key) {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        if let Some(quota) = self.quota
            && self.used_bytes_excluding(key) + value.len() > quota
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        let stored = if take_if_key(&mut self.corrupt_next_write, key) {
            let mut end = value.len() / 2;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            value[..end].to_string()
        } else {
            value.to_string()
        };
        self.values.insert(key.to_string(), stored);
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

fn take_if_key(hook: &mut Option<String>, key: &str) -> bool {
    if hook.as_deref() == Some(key) {
        *hook = None;
        true
    } else {
        false
    }
}
