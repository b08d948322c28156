use std::sync::Arc;

use crate::condition::{EvaluatedChoice, evaluate_choices, visible_choices};
use crate::error::{CoreError, CoreResult};
use crate::graph::{ConditionalChoice, DialogueNode, GraphStore};
use crate::index::NodeIndex;
use crate::reducer::apply_state_change;
use crate::state::GameState;

/// A playable session over one graph store.
pub struct NarrativeSession {
    graph: Arc<GraphStore>,
    state: GameState,
    index: NodeIndex,
}

impl NarrativeSession {
    /// Start a session from an existing state.
    ///
    /// Fails if the state's position does not exist in the graph; states
    /// handed out by the persistence layer always satisfy this.
    pub fn new(graph: Arc<GraphStore>, state: GameState) -> CoreResult<Self> {
        graph.require_node(&state.current_character_id, &state.current_node_id)?;
        Ok(Self {
            graph,
            state,
            index: NodeIndex::new(),
        })
    }

    /// Start a brand new game at the graph's safe-start node.
    pub fn new_game(graph: Arc<GraphStore>, player_id: impl Into<String>) -> Self {
        let state = GameState::new_for_graph(&graph, player_id);
        Self {
            graph,
            state,
            index: NodeIndex::new(),
        }
    }

    /// The content being played.
    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    /// The live state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the session, returning the state.
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// The node the player is on.
    pub fn current_node(&self) -> CoreResult<&DialogueNode> {
        self.graph
            .require_node(&self.state.current_character_id, &self.state.current_node_id)
    }

    /// Every choice on the current node with its visibility.
    pub fn evaluate(&self) -> CoreResult<Vec<EvaluatedChoice<'_>>> {
        let node = self.current_node()?;
        Ok(evaluate_choices(
            node,
            &self.state,
            &self.state.current_character_id,
        ))
    }

    /// Only the visible choices on the current node.
    pub fn visible_choices(&self) -> CoreResult<Vec<&ConditionalChoice>> {
        let node = self.current_node()?;
        Ok(visible_choices(
            node,
            &self.state,
            &self.state.current_character_id,
        ))
    }

    /// Take a visible choice: apply its consequence and move to its target.
    ///
    /// On error the state is left unchanged.
    pub fn choose(&mut self, choice_id: &str) -> CoreResult<&GameState> {
        let graph = Arc::clone(&self.graph);
        let character_id = self.state.current_character_id.clone();
        let node = graph.require_node(&character_id, &self.state.current_node_id)?;

        let evaluated = evaluate_choices(node, &self.state, &character_id);
        let entry = evaluated
            .iter()
            .find(|e| e.choice.choice_id == choice_id)
            .ok_or_else(|| CoreError::InvalidChoice(choice_id.to_string()))?;
        if !entry.visible {
            return Err(CoreError::ChoiceNotVisible(choice_id.to_string()));
        }
        let choice = entry.choice;

        let next_character = if graph.contains(&character_id, &choice.next_node_id) {
            character_id
        } else {
            self.index
                .locate(&graph, &choice.next_node_id)
                .map(str::to_string)
                .ok_or_else(|| CoreError::NodeNotFound {
                    node_id: choice.next_node_id.clone(),
                    character_id: character_id.clone(),
                })?
        };

        let mut next = match &choice.consequence {
            Some(change) => apply_state_change(&self.state, change),
            None => self.state.clone(),
        };
        next.reposition(choice.next_node_id.clone(), next_character);
        tracing::debug!(
            choice_id,
            node_id = %next.current_node_id,
            character_id = %next.current_character_id,
            "choice taken"
        );
        self.state = next;
        Ok(&self.state)
    }
}
