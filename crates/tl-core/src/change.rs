use std::collections::BTreeMap;

use serde::Deserialize;

use crate::pattern::PatternKind;

/// A partial delta to a [`GameState`](crate::GameState).
///
/// Every field is optional; absent fields are no-ops. Flags are only ever
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStateChange")]
pub struct StateChange {
    /// Per-pattern deltas.
    pub pattern_changes: BTreeMap<PatternKind, i32>,
    /// Changes scoped to one character.
    pub character: Option<CharacterChange>,
    /// Global flags to add.
    pub add_global_flags: Vec<String>,
    /// Mysteries to set to a new value.
    pub mystery_changes: BTreeMap<String, String>,
}

/// The character-scoped part of a [`StateChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterChange {
    /// The character affected.
    pub character_id: String,
    /// Trust delta, clamped after adding.
    pub trust_change: Option<i32>,
    /// Knowledge flags to add for this character.
    pub add_knowledge_flags: Vec<String>,
}

impl CharacterChange {
    /// A change for `character_id` that does nothing yet.
    pub fn new(character_id: impl Into<String>) -> Self {
        Self {
            character_id: character_id.into(),
            trust_change: None,
            add_knowledge_flags: Vec::new(),
        }
    }
}

impl StateChange {
    /// An empty change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern delta (accumulates with earlier deltas for the same pattern).
    pub fn with_pattern(mut self, kind: PatternKind, delta: i32) -> Self {
        *self.pattern_changes.entry(kind).or_insert(0) += delta;
        self
    }

    /// Set the trust delta for a character.
    pub fn with_trust(mut self, character_id: impl Into<String>, delta: i32) -> Self {
        self.character_entry(character_id.into()).trust_change = Some(delta);
        self
    }

    /// Add a knowledge flag for a character.
    pub fn with_knowledge(
        mut self,
        character_id: impl Into<String>,
        flag: impl Into<String>,
    ) -> Self {
        self.character_entry(character_id.into())
            .add_knowledge_flags
            .push(flag.into());
        self
    }

    /// Add a global flag.
    pub fn with_global_flag(mut self, flag: impl Into<String>) -> Self {
        self.add_global_flags.push(flag.into());
        self
    }

    /// Set a mystery value.
    pub fn with_mystery(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.mystery_changes.insert(name.into(), value.into());
        self
    }

    /// Whether applying this change would be a no-op on any state.
    pub fn is_empty(&self) -> bool {
        self.pattern_changes.is_empty()
            && self.add_global_flags.is_empty()
            && self.mystery_changes.is_empty()
            && self
                .character
                .as_ref()
                .is_none_or(|c| c.trust_change.is_none() && c.add_knowledge_flags.is_empty())
    }

    // A change targets at most one character; a second id replaces the first.
    fn character_entry(&mut self, character_id: String) -> &mut CharacterChange {
        if self
            .character
            .as_ref()
            .is_some_and(|c| c.character_id != character_id)
        {
            self.character = None;
        }
        self.character
            .get_or_insert_with(|| CharacterChange::new(character_id))
    }
}

/// The authored, flat consequence shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawStateChange {
    #[serde(default)]
    pattern_changes: BTreeMap<PatternKind, i32>,
    character_id: Option<String>,
    trust_change: Option<i32>,
    #[serde(default)]
    add_knowledge_flags: Vec<String>,
    #[serde(default)]
    add_global_flags: Vec<String>,
    #[serde(default)]
    mystery_changes: BTreeMap<String, String>,
}

impl TryFrom<RawStateChange> for StateChange {
    type Error = String;

    fn try_from(raw: RawStateChange) -> Result<Self, Self::Error> {
        let character = match raw.character_id {
            Some(character_id) => Some(CharacterChange {
                character_id,
                trust_change: raw.trust_change,
                add_knowledge_flags: raw.add_knowledge_flags,
            }),
            None if raw.trust_change.is_some() => {
                return Err("trustChange requires characterId".to_string());
            }
            None if !raw.add_knowledge_flags.is_empty() => {
                return Err("addKnowledgeFlags requires characterId".to_string());
            }
            None => None,
        };
        Ok(Self {
            pattern_changes: raw.pattern_changes,
            character,
            add_global_flags: raw.add_global_flags,
            mystery_changes: raw.mystery_changes,
        })
    }
}
