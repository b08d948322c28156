use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building content or navigating a session.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The content document could not be parsed.
    #[error("content parse error: {0}")]
    ContentParse(#[from] serde_json::Error),

    /// The content parsed but is not a usable graph store.
    #[error("invalid content: {0}")]
    Content(String),

    /// A node id could not be found in the named character's graph.
    #[error("node not found: {node_id} (character {character_id})")]
    NodeNotFound {
        /// The missing node id.
        node_id: String,
        /// The character graph that was searched.
        character_id: String,
    },

    /// The selected choice does not exist on the current node.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// The selected choice exists but is hidden by its condition.
    #[error("choice not available: {0}")]
    ChoiceNotVisible(String),
}
