use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::change::{CharacterChange, StateChange};
use crate::state::{CharacterState, GameState, MIN_TRUST, clamp_trust};

/// Apply `change` to `state`, producing a new state.
///
/// The input is never mutated. Containers the change does not touch are
/// shared with the input through their `Arc`.
pub fn apply_state_change(state: &GameState, change: &StateChange) -> GameState {
    let StateChange {
        pattern_changes,
        character,
        add_global_flags,
        mystery_changes,
    } = change;

    let mut next = state.clone();

    for (kind, delta) in pattern_changes {
        next.patterns.add(*kind, *delta);
    }

    if let Some(character) = character
        && let Some(characters) = apply_character_change(&state.characters, character)
    {
        next.characters = characters;
    }

    if let Some(flags) = union_flags(&state.global_flags, add_global_flags) {
        next.global_flags = flags;
    }

    if let Some(mysteries) = apply_mysteries(&state.mysteries, mystery_changes) {
        next.mysteries = mysteries;
    }

    next
}

type CharacterMap = BTreeMap<String, Arc<CharacterState>>;

fn apply_character_change(
    characters: &Arc<CharacterMap>,
    change: &CharacterChange,
) -> Option<Arc<CharacterMap>> {
    let existing = characters.get(&change.character_id).map(Arc::as_ref);
    let old_trust = existing.map_or(MIN_TRUST, |c| c.trust);
    let trust = change
        .trust_change
        .map_or(old_trust, |delta| clamp_trust(old_trust.saturating_add(delta)));
    let new_flags: Vec<&String> = change
        .add_knowledge_flags
        .iter()
        .filter(|flag| existing.is_none_or(|c| !c.knows(flag)))
        .collect();

    let unchanged = match existing {
        Some(_) => trust == old_trust && new_flags.is_empty(),
        None => change.trust_change.is_none() && new_flags.is_empty(),
    };
    if unchanged {
        return None;
    }

    let mut updated = existing.cloned().unwrap_or_default();
    updated.trust = trust;
    updated
        .knowledge_flags
        .extend(new_flags.into_iter().cloned());

    let mut map = CharacterMap::clone(characters);
    map.insert(change.character_id.clone(), Arc::new(updated));
    Some(Arc::new(map))
}

fn union_flags(flags: &Arc<BTreeSet<String>>, added: &[String]) -> Option<Arc<BTreeSet<String>>> {
    if added.iter().all(|f| flags.contains(f)) {
        return None;
    }
    let mut set = BTreeSet::clone(flags);
    set.extend(added.iter().cloned());
    Some(Arc::new(set))
}

fn apply_mysteries(
    mysteries: &Arc<BTreeMap<String, String>>,
    changes: &BTreeMap<String, String>,
) -> Option<Arc<BTreeMap<String, String>>> {
    if changes
        .iter()
        .all(|(k, v)| mysteries.get(k).is_some_and(|cur| cur == v))
    {
        return None;
    }
    let mut map = BTreeMap::clone(mysteries);
    map.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));
    Some(Arc::new(map))
}
