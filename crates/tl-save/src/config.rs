use chrono::TimeDelta;
use tl_core::DEFAULT_MAX_HOPS;

use crate::outcome::SaveSlot;

/// Default storage key of the primary save.
pub const DEFAULT_STORAGE_KEY: &str = "grand-central-save-v1";

/// Persistence settings.
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Key of the primary save.
    pub storage_key: String,
    /// Key the previous save is rotated into before each write.
    pub backup_key: String,
    /// Minimum time between two autosaves.
    pub autosave_interval: TimeDelta,
    /// Hop limit for redirect resolution at load time.
    pub max_redirect_hops: usize,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backup_key: backup_key_for(DEFAULT_STORAGE_KEY),
            autosave_interval: TimeDelta::seconds(30),
            max_redirect_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl SaveConfig {
    /// Use `key` for the primary save and `<key>-backup` for the backup.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self.backup_key = backup_key_for(&self.storage_key);
        self
    }

    /// Set the backup key explicitly.
    pub fn with_backup_key(mut self, key: impl Into<String>) -> Self {
        self.backup_key = key.into();
        self
    }

    /// Set the minimum autosave interval (negative values become zero).
    pub fn with_autosave_interval(mut self, interval: TimeDelta) -> Self {
        self.autosave_interval = interval.max(TimeDelta::zero());
        self
    }

    /// Set the redirect hop limit.
    pub fn with_max_redirect_hops(mut self, hops: usize) -> Self {
        self.max_redirect_hops = hops;
        self
    }

    /// Storage key of a slot. Imports have no key of their own and map to
    /// the primary key, which is where an accepted import is written.
    pub fn key(&self, slot: SaveSlot) -> &str {
        match slot {
            SaveSlot::Primary | SaveSlot::Import => &self.storage_key,
            SaveSlot::Backup => &self.backup_key,
        }
    }
}

fn backup_key_for(key: &str) -> String {
    format!("{key}-backup")
}
