use thiserror::Error;

use crate::storage::StorageError;
use crate::validate::ValidationError;

/// Result type for persistence operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Errors surfaced by save, import, and export.
///
/// `load` never returns these; it falls back to the backup slot and then to
/// a "no save" outcome instead.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save failed structural validation.
    #[error("invalid save: {0}")]
    Validation(#[from] ValidationError),

    /// The storage backend refused a read or write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The state could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Reading back a freshly written save returned different bytes.
    #[error("write verification failed for '{key}'")]
    VerifyMismatch {
        /// Storage key that was written.
        key: String,
    },

    /// No recovery step could find a valid position for the save.
    #[error("saved position '{node_id}' ({character_id}) could not be recovered")]
    GraphIntegrity {
        /// The node id the save pointed at.
        node_id: String,
        /// The character the save pointed at.
        character_id: String,
    },
}
