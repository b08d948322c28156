use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tl_core::state::clamp_trust;
use tl_core::{CharacterState, GameState, Patterns};

/// One character entry in a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// Character id.
    pub character_id: String,
    /// Trust with the character.
    pub trust: i32,
    /// Knowledge flags, sorted.
    pub knowledge_flags: Vec<String>,
}

/// A save as stored and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    /// Schema version the save was written with.
    pub save_version: String,
    /// Stable player id.
    pub player_id: String,
    /// Node the player is positioned at.
    pub current_node_id: String,
    /// Character owning the current node.
    pub current_character_id: String,
    /// The five pattern scores.
    pub patterns: Patterns,
    /// Per-character state.
    pub characters: Vec<CharacterRecord>,
    /// Global flags, sorted.
    pub global_flags: Vec<String>,
    /// Story mysteries.
    #[serde(default)]
    pub mysteries: BTreeMap<String, String>,
    /// When the save was written, as Unix milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_saved: DateTime<Utc>,
    /// Start of the session that wrote the save, as Unix milliseconds.
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub session_start_time: DateTime<Utc>,
}

impl SaveRecord {
    /// Flatten a live state into its wire form.
    pub fn from_state(state: &GameState) -> Self {
        Self {
            save_version: state.save_version.clone(),
            player_id: state.player_id.clone(),
            current_node_id: state.current_node_id.clone(),
            current_character_id: state.current_character_id.clone(),
            patterns: state.patterns,
            characters: state
                .characters
                .iter()
                .map(|(id, c)| CharacterRecord {
                    character_id: id.clone(),
                    trust: c.trust,
                    knowledge_flags: c.knowledge_flags.iter().cloned().collect(),
                })
                .collect(),
            global_flags: state.global_flags.iter().cloned().collect(),
            mysteries: BTreeMap::clone(&state.mysteries),
            last_saved: state.last_saved,
            session_start_time: state.session_start_time,
        }
    }

    /// Rebuild the in-memory state. `session_start` replaces the stored
    /// session start, since a session begins at load.
    pub fn into_state(self, session_start: DateTime<Utc>) -> GameState {
        let characters = self
            .characters
            .into_iter()
            .map(|c| {
                let state = CharacterState {
                    trust: clamp_trust(c.trust),
                    knowledge_flags: c.knowledge_flags.into_iter().collect(),
                };
                (c.character_id, Arc::new(state))
            })
            .collect();

        GameState {
            current_node_id: self.current_node_id,
            current_character_id: self.current_character_id,
            patterns: self.patterns,
            characters: Arc::new(characters),
            global_flags: Arc::new(self.global_flags.into_iter().collect::<BTreeSet<_>>()),
            mysteries: Arc::new(self.mysteries),
            save_version: self.save_version,
            player_id: self.player_id,
            last_saved: self.last_saved,
            session_start_time: session_start,
        }
    }
}
