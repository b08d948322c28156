//! Node redirects.
//!
//! When content retires or renames a node, it adds a redirect from the old id
//! to its replacement instead of reusing the id. Saves that still point at
//! the old id are walked forward at load time. Redirect chains are walked
//! with a hop limit and cycle detection, so a badly authored map can never
//! hang a load.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Default hop limit for [`resolve_redirect`].
pub const DEFAULT_MAX_HOPS: usize = 8;

/// One authored redirect, keyed by the retired node id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectEntry {
    /// Replacement node id.
    pub to_node_id: String,
    /// Why the node moved.
    #[serde(default)]
    pub reason: String,
    /// Content release or date the redirect was added in.
    #[serde(default)]
    pub added_at: String,
}

impl RedirectEntry {
    /// A redirect to `to_node_id`.
    pub fn new(to_node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            to_node_id: to_node_id.into(),
            reason: reason.into(),
            added_at: String::new(),
        }
    }
}

/// Map from retired node ids to their redirect.
#[derive(Debug, Clone, Default)]
pub struct RedirectMap {
    entries: HashMap<String, RedirectEntry>,
}

impl RedirectMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(from_node_id, entry)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, RedirectEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Add a redirect, replacing any existing one for `from`.
    pub fn with_redirect(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.entries.insert(from.into(), RedirectEntry::new(to, reason));
        self
    }

    /// The redirect for `node_id`, if any.
    pub fn get(&self, node_id: &str) -> Option<&RedirectEntry> {
        self.entries.get(node_id)
    }

    /// Number of redirects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk the redirect chain starting at `node_id`.
    pub fn resolve(&self, node_id: &str, max_hops: usize) -> RedirectResolution {
        resolve_redirect(self, node_id, max_hops)
    }
}

/// Outcome of walking a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResolution {
    /// Node the walk ended on (best effort if the walk was cut short).
    pub resolved_node_id: String,
    /// Every node reached, starting with the input id.
    pub path: Vec<String>,
    /// Redirects followed.
    pub hops: usize,
    /// The chain looped back on a node already visited.
    pub cycle_detected: bool,
    /// The hop limit was reached while a further redirect existed.
    pub truncated: bool,
}

impl RedirectResolution {
    /// The walk ended normally, without a cycle or truncation.
    pub fn is_clean(&self) -> bool {
        !self.cycle_detected && !self.truncated
    }

    /// At least one redirect was followed.
    pub fn moved(&self) -> bool {
        self.hops > 0
    }
}

impl fmt::Display for RedirectResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join(" -> "))?;
        if self.cycle_detected {
            write!(f, " (cycle)")?;
        }
        if self.truncated {
            write!(f, " (truncated)")?;
        }
        Ok(())
    }
}

/// Follow redirects from `node_id` until none remains, a node repeats, or
/// `max_hops` redirects have been followed.
pub fn resolve_redirect(map: &RedirectMap, node_id: &str, max_hops: usize) -> RedirectResolution {
    let mut path = vec![node_id.to_string()];
    let mut current = node_id;
    let mut hops = 0;
    let mut cycle_detected = false;
    let mut truncated = false;

    while let Some(entry) = map.get(current) {
        if hops >= max_hops {
            truncated = true;
            break;
        }
        let next = entry.to_node_id.as_str();
        if path.iter().any(|seen| seen == next) {
            cycle_detected = true;
            break;
        }
        path.push(next.to_string());
        current = next;
        hops += 1;
    }

    RedirectResolution {
        resolved_node_id: current.to_string(),
        path,
        hops,
        cycle_detected,
        truncated,
    }
}
