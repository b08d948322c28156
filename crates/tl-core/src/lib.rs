//! Core narrative model for Threadline.
//!
//! This crate holds everything that is pure: the authored dialogue graphs
//! ([`GraphStore`]), the player's save state ([`GameState`]), the condition
//! evaluator that decides which choices are visible, the reducer that applies
//! a [`StateChange`], and the redirect resolver that keeps old saves pointing
//! at live nodes. Persistence lives in `tl-save`.

/// State deltas attached to dialogue choices.
pub mod change;
/// Choice visibility conditions and the anti-deadlock evaluator.
pub mod condition;
/// Error types used throughout the crate.
pub mod error;
/// Dialogue nodes, per-character graphs, and the content loader.
pub mod graph;
/// Lazily built node-id lookup index.
pub mod index;
/// The five playstyle pattern scores.
pub mod pattern;
/// The pure state reducer.
pub mod reducer;
/// Node redirect map and resolver.
pub mod redirect;
/// Explicit narrative context: graph plus live game state.
pub mod session;
/// Player save state and per-character state.
pub mod state;

/// Re-export state change types.
pub use change::{CharacterChange, StateChange};
/// Re-export condition types and the evaluator.
pub use condition::{Bound, Condition, EvaluatedChoice, evaluate_choices, visible_choices};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export graph types.
pub use graph::{CharacterGraph, ConditionalChoice, DialogueContent, DialogueNode, GraphStore, NodeRef};
/// Re-export the node index.
pub use index::NodeIndex;
/// Re-export pattern types.
pub use pattern::{PatternKind, Patterns};
/// Re-export the reducer entry point.
pub use reducer::apply_state_change;
/// Re-export redirect types and the resolver.
pub use redirect::{DEFAULT_MAX_HOPS, RedirectEntry, RedirectMap, RedirectResolution, resolve_redirect};
/// Re-export the narrative session.
pub use session::NarrativeSession;
/// Re-export state types.
pub use state::{CURRENT_SAVE_VERSION, CharacterState, GameState, MAX_TRUST, MIN_TRUST};
