//! Position repair for loaded saves.
//!
//! A save can outlive the content it was written against. Before a loaded
//! state is handed out, its position is pushed through the redirect map and
//! then checked against the graph. When the node is not where the save says,
//! the ladder tries, in order: the graph that does hold the node, the saved
//! character's hub, and the global safe start. Only the position moves;
//! patterns, trust, flags, and mysteries are never touched here.

use std::fmt;

use tl_core::{GameState, GraphStore, NodeIndex, NodeRef, RedirectResolution};

use crate::error::{SaveError, SaveResult};

/// A recovery step applied to a loaded position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The node exists, but in another character's graph.
    RelocatedCharacter {
        /// The node, unchanged.
        node_id: String,
        /// Character the save claimed.
        from_character: String,
        /// Character whose graph holds the node.
        to_character: String,
    },
    /// The node is gone; the player was moved to the character's hub.
    CharacterHub {
        /// Node the save pointed at.
        missing_node_id: String,
        /// Character whose hub was used.
        character_id: String,
        /// The hub node.
        hub_node_id: String,
    },
    /// Neither the node nor the character exists; the player was moved to
    /// the global safe start.
    SafeStart {
        /// Node the save pointed at.
        missing_node_id: String,
        /// The safe start.
        node: NodeRef,
    },
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelocatedCharacter {
                node_id,
                from_character,
                to_character,
            } => write!(f, "node '{node_id}' moved from {from_character} to {to_character}"),
            Self::CharacterHub {
                missing_node_id,
                character_id,
                hub_node_id,
            } => write!(
                f,
                "node '{missing_node_id}' missing; moved to {character_id} hub '{hub_node_id}'"
            ),
            Self::SafeStart {
                missing_node_id,
                node,
            } => write!(
                f,
                "node '{missing_node_id}' missing; moved to safe start {}/{}",
                node.character_id, node.node_id
            ),
        }
    }
}

/// What [`restore_position`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredPosition {
    /// The redirect walk, when it moved the node or was cut short.
    pub redirect: Option<RedirectResolution>,
    /// The recovery rung used, if any.
    pub recovery: Option<Recovery>,
}

/// Redirect, verify, and if needed recover the position of `state`.
///
/// Fails with [`SaveError::GraphIntegrity`] only when even the safe start is
/// missing from the graph.
pub fn restore_position(
    state: &mut GameState,
    graph: &GraphStore,
    index: &mut NodeIndex,
    max_hops: usize,
) -> SaveResult<RestoredPosition> {
    let mut restored = RestoredPosition::default();

    let resolution = graph.redirects().resolve(&state.current_node_id, max_hops);
    if !resolution.is_clean() {
        tracing::warn!(
            path = %resolution,
            node_id = %resolution.resolved_node_id,
            "redirect walk cut short; continuing with best-effort node"
        );
    }
    let clean_move = resolution.is_clean() && resolution.moved();
    if resolution.moved() || !resolution.is_clean() {
        if clean_move {
            tracing::info!(path = %resolution, "followed node redirect");
        }
        state.current_node_id = resolution.resolved_node_id.clone();
        restored.redirect = Some(resolution);
    }

    if graph.contains(&state.current_character_id, &state.current_node_id) {
        return Ok(restored);
    }

    // Rung 1: the node lives in some other graph.
    if let Some(owner) = index.locate(graph, &state.current_node_id) {
        let owner = owner.to_string();
        let from = std::mem::replace(&mut state.current_character_id, owner.clone());
        if clean_move {
            tracing::info!(
                node_id = %state.current_node_id,
                from = %from,
                to = %owner,
                "redirect target lives in another graph"
            );
        } else {
            tracing::warn!(
                node_id = %state.current_node_id,
                from = %from,
                to = %owner,
                "relocated saved node to owning character"
            );
            restored.recovery = Some(Recovery::RelocatedCharacter {
                node_id: state.current_node_id.clone(),
                from_character: from,
                to_character: owner,
            });
        }
        return Ok(restored);
    }

    // Rung 2: the character still exists; use its hub.
    if let Some(hub) = graph.hub(&state.current_character_id) {
        let missing = std::mem::replace(&mut state.current_node_id, hub.to_string());
        tracing::warn!(
            missing = %missing,
            character_id = %state.current_character_id,
            hub = %hub,
            "saved node missing; recovered to character hub"
        );
        restored.recovery = Some(Recovery::CharacterHub {
            missing_node_id: missing,
            character_id: state.current_character_id.clone(),
            hub_node_id: hub.to_string(),
        });
        return Ok(restored);
    }

    // Rung 3: the global safe start.
    let start = graph.safe_start();
    if !graph.contains(&start.character_id, &start.node_id) {
        return Err(SaveError::GraphIntegrity {
            node_id: state.current_node_id.clone(),
            character_id: state.current_character_id.clone(),
        });
    }
    let missing = state.current_node_id.clone();
    tracing::warn!(
        missing = %missing,
        character_id = %state.current_character_id,
        safe_start = %start.node_id,
        "saved node and character missing; recovered to safe start"
    );
    state.reposition(start.node_id.clone(), start.character_id.clone());
    restored.recovery = Some(Recovery::SafeStart {
        missing_node_id: missing,
        node: start.clone(),
    });
    Ok(restored)
}
