use std::collections::BTreeMap;

use serde::Deserialize;

use crate::graph::{ConditionalChoice, DialogueNode};
use crate::pattern::PatternKind;
use crate::state::GameState;

/// An inclusive numeric range; missing ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bound {
    /// Lowest accepted value.
    pub min: Option<i32>,
    /// Highest accepted value.
    pub max: Option<i32>,
}

impl Bound {
    /// A bound accepting `min..=max`.
    pub fn between(min: i32, max: i32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A bound accepting `min..`.
    pub fn at_least(min: i32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// A bound accepting `..=max`.
    pub fn at_most(max: i32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Whether `value` lies within the bound.
    pub fn contains(&self, value: i32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A condition that can be evaluated against the player's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ConditionSpec")]
pub enum Condition {
    /// Trust with the evaluated character lies within the bound.
    Trust(Bound),
    /// A pattern score lies within the bound.
    Pattern {
        /// Pattern to read.
        pattern: PatternKind,
        /// Accepted range.
        bound: Bound,
    },
    /// A global flag is set.
    HasGlobalFlag(String),
    /// A global flag is not set.
    LacksGlobalFlag(String),
    /// The evaluated character has a knowledge flag.
    HasKnowledge(String),
    /// The evaluated character lacks a knowledge flag.
    LacksKnowledge(String),
    /// Logical AND.
    And(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Evaluate against `state`, reading trust and knowledge from `character_id`.
    pub fn evaluate(&self, state: &GameState, character_id: &str) -> bool {
        match self {
            Condition::Trust(bound) => bound.contains(state.trust(character_id)),
            Condition::Pattern { pattern, bound } => bound.contains(state.patterns.get(*pattern)),
            Condition::HasGlobalFlag(flag) => state.has_global_flag(flag),
            Condition::LacksGlobalFlag(flag) => !state.has_global_flag(flag),
            Condition::HasKnowledge(flag) => state
                .character(character_id)
                .is_some_and(|c| c.knows(flag)),
            Condition::LacksKnowledge(flag) => !state
                .character(character_id)
                .is_some_and(|c| c.knows(flag)),
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(state, character_id)),
            Condition::Always => true,
        }
    }
}

/// The authored `visibleCondition` object. Every present field is ANDed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConditionSpec {
    trust: Option<Bound>,
    #[serde(default)]
    patterns: BTreeMap<PatternKind, Bound>,
    #[serde(default)]
    has_global_flags: Vec<String>,
    #[serde(default)]
    lacks_global_flags: Vec<String>,
    #[serde(default)]
    has_knowledge_flags: Vec<String>,
    #[serde(default)]
    lacks_knowledge_flags: Vec<String>,
}

impl From<ConditionSpec> for Condition {
    fn from(spec: ConditionSpec) -> Self {
        let mut all = Vec::new();
        all.extend(spec.trust.map(Condition::Trust));
        all.extend(
            spec.patterns
                .into_iter()
                .map(|(pattern, bound)| Condition::Pattern { pattern, bound }),
        );
        all.extend(spec.has_global_flags.into_iter().map(Condition::HasGlobalFlag));
        all.extend(spec.lacks_global_flags.into_iter().map(Condition::LacksGlobalFlag));
        all.extend(spec.has_knowledge_flags.into_iter().map(Condition::HasKnowledge));
        all.extend(spec.lacks_knowledge_flags.into_iter().map(Condition::LacksKnowledge));

        match all.len() {
            0 => Condition::Always,
            1 => all.pop().unwrap_or_default(),
            _ => Condition::And(all),
        }
    }
}

/// A choice paired with its visibility.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatedChoice<'a> {
    /// The authored choice.
    pub choice: &'a ConditionalChoice,
    /// Whether the player may see and pick it.
    pub visible: bool,
}

/// Decide which of `node`'s choices are visible, in authored order.
///
/// When no choice passes its condition, every choice is made visible so the
/// player is never left without an action.
pub fn evaluate_choices<'a>(
    node: &'a DialogueNode,
    state: &GameState,
    character_id: &str,
) -> Vec<EvaluatedChoice<'a>> {
    let mut evaluated: Vec<EvaluatedChoice<'a>> = node
        .choices
        .iter()
        .map(|choice| EvaluatedChoice {
            choice,
            visible: choice
                .visible_condition
                .as_ref()
                .is_none_or(|c| c.evaluate(state, character_id)),
        })
        .collect();

    if !evaluated.is_empty() && evaluated.iter().all(|e| !e.visible) {
        tracing::warn!(
            node_id = %node.node_id,
            character_id,
            choices = evaluated.len(),
            "no choice passed its condition; showing all choices"
        );
        for entry in &mut evaluated {
            entry.visible = true;
        }
    }

    evaluated
}

/// Only the visible choices of `node`, in authored order.
pub fn visible_choices<'a>(
    node: &'a DialogueNode,
    state: &GameState,
    character_id: &str,
) -> Vec<&'a ConditionalChoice> {
    evaluate_choices(node, state, character_id)
        .into_iter()
        .filter(|e| e.visible)
        .map(|e| e.choice)
        .collect()
}
