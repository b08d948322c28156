//! Save persistence for Threadline.
//!
//! [`PersistenceManager`] is the only part of the engine with side effects.
//! It validates and writes saves with backup rotation and read-back
//! verification, and on load it validates, migrates, resolves node redirects,
//! and walks a recovery ladder so that a save whose position no longer exists
//! still loads with every bit of progress intact.

/// Manager configuration.
pub mod config;
/// Error types for save persistence.
pub mod error;
/// The persistence manager.
pub mod manager;
/// Forward-only save migrations.
pub mod migrate;
/// Results reported by load, autosave, and inspect.
pub mod outcome;
pub mod recovery;
pub mod storage;
/// Structural save validation.
pub mod validate;
/// The persisted save schema.
pub mod wire;

pub use config::SaveConfig;
pub use error::{SaveError, SaveResult};
pub use manager::PersistenceManager;
pub use outcome::{AutosaveOutcome, LoadOutcome, LoadReport, LoadedGame, SaveInspection, SaveSlot, SlotStatus};
pub use recovery::Recovery;
pub use storage::{FileStorage, MemoryStorage, SaveStorage, StorageError};
pub use validate::ValidationError;
pub use wire::SaveRecord;
