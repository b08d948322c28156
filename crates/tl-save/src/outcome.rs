use std::fmt;

use chrono::{DateTime, Utc};
use tl_core::{GameState, RedirectResolution};

use crate::recovery::Recovery;

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveSlot {
    /// The primary save.
    Primary,
    /// The backup rotated in before the last successful write.
    Backup,
    /// JSON handed to `import_save`.
    Import,
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Backup => "backup",
            Self::Import => "import",
        })
    }
}

/// Everything that happened to a save on its way back into memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Version the save was migrated from, if a migration ran.
    pub migrated_from: Option<String>,
    /// Redirect walk, if the saved node was redirected or the walk was cut short.
    pub redirect: Option<RedirectResolution>,
    /// Recovery step taken, if the position had to be repaired.
    pub recovery: Option<Recovery>,
}

impl LoadReport {
    /// Nothing was migrated, redirected, or recovered.
    pub fn is_clean(&self) -> bool {
        self.migrated_from.is_none() && self.redirect.is_none() && self.recovery.is_none()
    }
}

/// A state restored from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGame {
    /// The restored state, positioned on a node that exists.
    pub state: GameState,
    /// Slot the state was read from.
    pub slot: SaveSlot,
    /// Details of migration, redirects, and recovery.
    pub report: LoadReport,
}

/// Result of [`load`](crate::PersistenceManager::load).
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum LoadOutcome {
    /// A usable state was found.
    Loaded(LoadedGame),
    /// No usable save exists; start a new game.
    NoSave,
}

impl LoadOutcome {
    /// The loaded game, if any.
    pub fn loaded(self) -> Option<LoadedGame> {
        match self {
            Self::Loaded(game) => Some(game),
            Self::NoSave => None,
        }
    }

    /// Whether a state was loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Result of an autosave attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum AutosaveOutcome {
    /// The state was written; holds the stamped state.
    Saved(GameState),
    /// Skipped because the previous autosave is too recent.
    Throttled,
}

/// Status of one storage slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    /// Nothing stored under the key.
    Missing,
    /// The backend failed to read the key.
    Unreadable(String),
    /// Stored, but not a valid save.
    Invalid(String),
    /// A valid save.
    Valid {
        /// Version the save was written with.
        save_version: String,
        /// Player id.
        player_id: String,
        /// Saved node.
        current_node_id: String,
        /// Saved character.
        current_character_id: String,
        /// When it was written.
        last_saved: DateTime<Utc>,
    },
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Unreadable(e) => write!(f, "unreadable ({e})"),
            Self::Invalid(e) => write!(f, "invalid ({e})"),
            Self::Valid {
                save_version,
                current_node_id,
                current_character_id,
                last_saved,
                ..
            } => write!(
                f,
                "v{save_version} at {current_character_id}/{current_node_id}, saved {}",
                last_saved.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

/// Status of both slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveInspection {
    /// Primary key and its status.
    pub primary: (String, SlotStatus),
    /// Backup key and its status.
    pub backup: (String, SlotStatus),
}
