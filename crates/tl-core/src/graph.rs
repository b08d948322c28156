use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::change::StateChange;
use crate::condition::Condition;
use crate::error::{CoreError, CoreResult};
use crate::redirect::{RedirectEntry, RedirectMap};

/// One line of node content. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialogueContent {
    /// The spoken or narrated text.
    pub text: String,
    /// Optional emotion tag for presentation.
    #[serde(default)]
    pub emotion: Option<String>,
}

impl DialogueContent {
    /// Content with no emotion tag.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emotion: None,
        }
    }
}

/// A choice the player may take from a node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalChoice {
    /// Stable id of the choice within its node.
    pub choice_id: String,
    /// Text shown to the player.
    pub text: String,
    /// Node reached after taking this choice.
    pub next_node_id: String,
    /// Condition hiding the choice when false.
    #[serde(default)]
    pub visible_condition: Option<Condition>,
    /// Change applied when the choice is taken.
    #[serde(default)]
    pub consequence: Option<StateChange>,
}

impl ConditionalChoice {
    /// A choice with no condition and no consequence.
    pub fn new(
        choice_id: impl Into<String>,
        text: impl Into<String>,
        next_node_id: impl Into<String>,
    ) -> Self {
        Self {
            choice_id: choice_id.into(),
            text: text.into(),
            next_node_id: next_node_id.into(),
            visible_condition: None,
            consequence: None,
        }
    }

    /// Set the visibility condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.visible_condition = Some(condition);
        self
    }

    /// Set the consequence.
    pub fn with_consequence(mut self, change: StateChange) -> Self {
        self.consequence = Some(change);
        self
    }
}

/// A single dialogue node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueNode {
    /// Unique id of the node within its character graph.
    pub node_id: String,
    /// Ordered content lines.
    #[serde(default)]
    pub content: Vec<DialogueContent>,
    /// Ordered choices.
    #[serde(default)]
    pub choices: Vec<ConditionalChoice>,
}

impl DialogueNode {
    /// An empty node.
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            content: Vec::new(),
            choices: Vec::new(),
        }
    }

    /// Append a content line.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(DialogueContent::new(text));
        self
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: ConditionalChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Find a choice by id.
    pub fn choice(&self, choice_id: &str) -> Option<&ConditionalChoice> {
        self.choices.iter().find(|c| c.choice_id == choice_id)
    }
}

/// All nodes belonging to one character.
#[derive(Debug, Clone)]
pub struct CharacterGraph {
    character_id: String,
    hub: String,
    nodes: HashMap<String, DialogueNode>,
}

impl CharacterGraph {
    /// Build a graph. Fails on duplicate node ids or a hub that is not one of
    /// the nodes.
    pub fn new(
        character_id: impl Into<String>,
        hub: impl Into<String>,
        nodes: impl IntoIterator<Item = DialogueNode>,
    ) -> CoreResult<Self> {
        let character_id = character_id.into();
        let hub = hub.into();
        let mut map = HashMap::new();
        for node in nodes {
            if map.contains_key(&node.node_id) {
                return Err(CoreError::Content(format!(
                    "duplicate node '{}' in graph '{character_id}'",
                    node.node_id
                )));
            }
            map.insert(node.node_id.clone(), node);
        }
        if !map.contains_key(&hub) {
            return Err(CoreError::Content(format!(
                "hub '{hub}' is not a node of graph '{character_id}'"
            )));
        }
        Ok(Self {
            character_id,
            hub,
            nodes: map,
        })
    }

    /// The owning character.
    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    /// The character's hub (landing) node.
    pub fn hub(&self) -> &str {
        &self.hub
    }

    /// Look up a node.
    pub fn node(&self, node_id: &str) -> Option<&DialogueNode> {
        self.nodes.get(node_id)
    }

    /// Whether the graph contains `node_id`.
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Iterate all nodes (unordered).
    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A position in the store: a node in a specific character's graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    /// Character graph.
    pub character_id: String,
    /// Node within that graph.
    pub node_id: String,
}

impl NodeRef {
    /// Build a reference.
    pub fn new(character_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            character_id: character_id.into(),
            node_id: node_id.into(),
        }
    }
}

/// Every character graph plus the redirect map.
#[derive(Debug, Clone)]
pub struct GraphStore {
    characters: BTreeMap<String, CharacterGraph>,
    redirects: RedirectMap,
    safe_start: NodeRef,
}

impl GraphStore {
    /// Build a store. Fails on duplicate character ids or a safe start that
    /// does not exist.
    pub fn new(
        graphs: impl IntoIterator<Item = CharacterGraph>,
        redirects: RedirectMap,
        safe_start: NodeRef,
    ) -> CoreResult<Self> {
        let mut characters = BTreeMap::new();
        for graph in graphs {
            let id = graph.character_id.clone();
            if characters.insert(id.clone(), graph).is_some() {
                return Err(CoreError::Content(format!("duplicate character graph '{id}'")));
            }
        }
        let store = Self {
            characters,
            redirects,
            safe_start,
        };
        if !store.contains(&store.safe_start.character_id, &store.safe_start.node_id) {
            return Err(CoreError::Content(format!(
                "safe start '{}' is not a node of graph '{}'",
                store.safe_start.node_id, store.safe_start.character_id
            )));
        }
        Ok(store)
    }

    /// Parse an authored content document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let doc: ContentDocument = serde_json::from_str(json)?;
        let graphs = doc
            .characters
            .into_iter()
            .map(|(id, g)| CharacterGraph::new(id, g.hub, g.nodes))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(graphs, RedirectMap::from_entries(doc.redirects), doc.safe_start)
    }

    /// A character's graph.
    pub fn graph(&self, character_id: &str) -> Option<&CharacterGraph> {
        self.characters.get(character_id)
    }

    /// Look up a node in a character's graph.
    pub fn node(&self, character_id: &str, node_id: &str) -> Option<&DialogueNode> {
        self.graph(character_id).and_then(|g| g.node(node_id))
    }

    /// Look up a node, failing with [`CoreError::NodeNotFound`].
    pub fn require_node(&self, character_id: &str, node_id: &str) -> CoreResult<&DialogueNode> {
        self.node(character_id, node_id)
            .ok_or_else(|| CoreError::NodeNotFound {
                node_id: node_id.to_string(),
                character_id: character_id.to_string(),
            })
    }

    /// Whether `node_id` exists in `character_id`'s graph.
    pub fn contains(&self, character_id: &str, node_id: &str) -> bool {
        self.graph(character_id).is_some_and(|g| g.contains(node_id))
    }

    /// The hub node of a character, if the character exists.
    pub fn hub(&self, character_id: &str) -> Option<&str> {
        self.graph(character_id).map(CharacterGraph::hub)
    }

    /// The global safe-start node.
    pub fn safe_start(&self) -> &NodeRef {
        &self.safe_start
    }

    /// The redirect map.
    pub fn redirects(&self) -> &RedirectMap {
        &self.redirects
    }

    /// All character ids in sorted order.
    pub fn character_ids(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    /// All graphs in character-id order.
    pub fn graphs(&self) -> impl Iterator<Item = &CharacterGraph> {
        self.characters.values()
    }

    /// Total number of nodes across every graph.
    pub fn node_count(&self) -> usize {
        self.characters.values().map(CharacterGraph::len).sum()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDocument {
    safe_start: NodeRef,
    characters: BTreeMap<String, ContentGraph>,
    #[serde(default)]
    redirects: BTreeMap<String, RedirectEntry>,
}

#[derive(Debug, Deserialize)]
struct ContentGraph {
    hub: String,
    nodes: Vec<DialogueNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;

    const CONTENT: &str = r#"{
        "safeStart": { "characterId": "samuel", "nodeId": "samuel_introduction" },
        "characters": {
            "samuel": {
                "hub": "samuel_hub",
                "nodes": [
                    {
                        "nodeId": "samuel_introduction",
                        "content": [{ "text": "Welcome to the station.", "emotion": "warm" }],
                        "choices": [
                            { "choiceId": "go", "text": "Thanks.", "nextNodeId": "samuel_hub",
                              "consequence": { "patternChanges": { "patience": 1 } } }
                        ]
                    },
                    { "nodeId": "samuel_hub", "content": [{ "text": "Where to?" }] }
                ]
            },
            "maya": {
                "hub": "maya_hub",
                "nodes": [
                    {
                        "nodeId": "maya_hub",
                        "choices": [
                            { "choiceId": "ask", "text": "Robots?", "nextNodeId": "maya_hub",
                              "visibleCondition": { "trust": { "min": 3 } } }
                        ]
                    }
                ]
            }
        },
        "redirects": {
            "maya_old_node": { "toNodeId": "maya_hub", "reason": "merged", "addedAt": "2025-03-01" }
        }
    }"#;

    #[test]
    fn parses_content_document() {
        let store = GraphStore::from_json(CONTENT).unwrap();
        assert_eq!(store.character_ids().collect::<Vec<_>>(), ["maya", "samuel"]);
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.hub("maya"), Some("maya_hub"));
        assert_eq!(store.safe_start(), &NodeRef::new("samuel", "samuel_introduction"));
        assert!(store.redirects().get("maya_old_node").is_some());

        let intro = store.node("samuel", "samuel_introduction").unwrap();
        assert_eq!(intro.content[0].emotion.as_deref(), Some("warm"));
        let change = intro.choices[0].consequence.as_ref().unwrap();
        assert_eq!(change.pattern_changes[&PatternKind::Patience], 1);

        let ask = store.node("maya", "maya_hub").unwrap().choice("ask").unwrap();
        assert!(ask.visible_condition.is_some());
    }

    #[test]
    fn contains_is_scoped_to_character() {
        let store = GraphStore::from_json(CONTENT).unwrap();
        assert!(store.contains("maya", "maya_hub"));
        assert!(!store.contains("samuel", "maya_hub"));
        assert!(!store.contains("nobody", "maya_hub"));
        assert!(store.require_node("samuel", "maya_hub").is_err());
    }

    #[test]
    fn duplicate_node_rejected() {
        let result = CharacterGraph::new(
            "maya",
            "a",
            [DialogueNode::new("a"), DialogueNode::new("a")],
        );
        assert!(matches!(result, Err(CoreError::Content(_))));
    }

    #[test]
    fn missing_hub_rejected() {
        let result = CharacterGraph::new("maya", "hub", [DialogueNode::new("a")]);
        assert!(matches!(result, Err(CoreError::Content(_))));
    }

    #[test]
    fn missing_safe_start_rejected() {
        let graph = CharacterGraph::new("maya", "a", [DialogueNode::new("a")]).unwrap();
        let result = GraphStore::new([graph], RedirectMap::new(), NodeRef::new("maya", "b"));
        assert!(matches!(result, Err(CoreError::Content(_))));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            GraphStore::from_json("{ not json"),
            Err(CoreError::ContentParse(_))
        ));
    }

    #[test]
    fn node_builder() {
        let node = DialogueNode::new("n")
            .with_text("Hello.")
            .with_choice(ConditionalChoice::new("c", "Hi", "m"));
        assert_eq!(node.content.len(), 1);
        assert_eq!(node.choice("c").unwrap().next_node_id, "m");
        assert!(node.choice("x").is_none());
    }
}
