use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::graph::GraphStore;
use crate::pattern::Patterns;

/// Lowest trust a character can hold.
pub const MIN_TRUST: i32 = 0;
/// Highest trust a character can hold.
pub const MAX_TRUST: i32 = 10;
/// The save schema version this build writes.
pub const CURRENT_SAVE_VERSION: &str = "1.2.0";
/// Where a brand new game starts.
pub const INTRO_NODE_ID: &str = "samuel_introduction";
/// The character who owns the introduction node.
pub const INTRO_CHARACTER_ID: &str = "samuel";

/// Story mysteries and the value each starts with.
pub const DEFAULT_MYSTERIES: [(&str, &str); 4] = [
    ("letter_sender", "unknown"),
    ("platform_seven", "stable"),
    ("samuels_past", "hidden"),
    ("station_nature", "unknown"),
];

/// Relationship state with one character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterState {
    /// Relationship depth, always within `[MIN_TRUST, MAX_TRUST]`.
    pub trust: i32,
    /// Facts learned about this character. Append-only.
    pub knowledge_flags: BTreeSet<String>,
}

impl CharacterState {
    /// A character with the given trust (clamped) and no knowledge.
    pub fn with_trust(trust: i32) -> Self {
        Self {
            trust: clamp_trust(trust),
            knowledge_flags: BTreeSet::new(),
        }
    }

    /// Whether the player has learned `flag` about this character.
    pub fn knows(&self, flag: &str) -> bool {
        self.knowledge_flags.contains(flag)
    }
}

/// Clamp a trust value into `[MIN_TRUST, MAX_TRUST]`.
pub fn clamp_trust(trust: i32) -> i32 {
    trust.clamp(MIN_TRUST, MAX_TRUST)
}

/// The player's full save state.
///
/// Collections sit behind [`Arc`] so that derived states can share them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Node the player is positioned at.
    pub current_node_id: String,
    /// Character whose graph holds `current_node_id`.
    pub current_character_id: String,
    /// Playstyle scores.
    pub patterns: Patterns,
    /// Per-character relationship state.
    pub characters: Arc<BTreeMap<String, Arc<CharacterState>>>,
    /// Story-wide flags. Append-only.
    pub global_flags: Arc<BTreeSet<String>>,
    /// Story-progress mysteries and their current value.
    pub mysteries: Arc<BTreeMap<String, String>>,
    /// Schema version of this state.
    pub save_version: String,
    /// Stable player identifier.
    pub player_id: String,
    /// When this state was last written.
    pub last_saved: DateTime<Utc>,
    /// When the current session began. Reset on every load.
    pub session_start_time: DateTime<Utc>,
}

impl GameState {
    /// Create a fresh game positioned at the introduction node.
    pub fn new(player_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            current_node_id: INTRO_NODE_ID.to_string(),
            current_character_id: INTRO_CHARACTER_ID.to_string(),
            patterns: Patterns::default(),
            characters: Arc::new(BTreeMap::new()),
            global_flags: Arc::new(BTreeSet::new()),
            mysteries: Arc::new(default_mysteries()),
            save_version: CURRENT_SAVE_VERSION.to_string(),
            player_id: player_id.into(),
            last_saved: now,
            session_start_time: now,
        }
    }

    /// Create a fresh game positioned at the graph's safe-start node, with
    /// every authored character seeded at minimum trust.
    pub fn new_for_graph(graph: &GraphStore, player_id: impl Into<String>) -> Self {
        let start = graph.safe_start();
        let characters = graph
            .character_ids()
            .map(|id| (id.to_string(), Arc::new(CharacterState::default())))
            .collect();
        Self {
            current_node_id: start.node_id.clone(),
            current_character_id: start.character_id.clone(),
            characters: Arc::new(characters),
            ..Self::new(player_id)
        }
    }

    /// State for one character, if the player has met them.
    pub fn character(&self, character_id: &str) -> Option<&CharacterState> {
        self.characters.get(character_id).map(Arc::as_ref)
    }

    /// Trust with a character; unknown characters read as [`MIN_TRUST`].
    pub fn trust(&self, character_id: &str) -> i32 {
        self.character(character_id).map_or(MIN_TRUST, |c| c.trust)
    }

    /// Whether a global flag is set.
    pub fn has_global_flag(&self, flag: &str) -> bool {
        self.global_flags.contains(flag)
    }

    /// Current value of a mystery.
    pub fn mystery(&self, name: &str) -> Option<&str> {
        self.mysteries.get(name).map(String::as_str)
    }

    /// Change the player's position without touching any progress field.
    pub fn reposition(&mut self, node_id: impl Into<String>, character_id: impl Into<String>) {
        self.current_node_id = node_id.into();
        self.current_character_id = character_id.into();
    }
}

/// The default mystery map for a new game.
pub fn default_mysteries() -> BTreeMap<String, String> {
    DEFAULT_MYSTERIES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
