use std::collections::HashMap;

use crate::graph::GraphStore;

/// Lazily built map from node id to the character graphs containing it.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    entries: Option<HashMap<String, Vec<String>>>,
}

impl NodeIndex {
    /// An index that has not been built yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Character ids whose graph contains `node_id`, in character-id order.
    pub fn characters_for(&mut self, graph: &GraphStore, node_id: &str) -> &[String] {
        let entries = self.entries.get_or_insert_with(|| build(graph));
        entries.get(node_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first character whose graph contains `node_id`.
    pub fn locate(&mut self, graph: &GraphStore, node_id: &str) -> Option<&str> {
        self.characters_for(graph, node_id)
            .first()
            .map(String::as_str)
    }

    /// Whether the index has been built.
    pub fn is_built(&self) -> bool {
        self.entries.is_some()
    }

    /// Drop the index; the next lookup rebuilds it.
    pub fn invalidate(&mut self) {
        self.entries = None;
    }
}

fn build(graph: &GraphStore) -> HashMap<String, Vec<String>> {
    let mut entries: HashMap<String, Vec<String>> = HashMap::with_capacity(graph.node_count());
    for character in graph.graphs() {
        for node in character.nodes() {
            entries
                .entry(node.node_id.clone())
                .or_default()
                .push(character.character_id().to_string());
        }
    }
    tracing::debug!(nodes = entries.len(), "built node index");
    entries
}
