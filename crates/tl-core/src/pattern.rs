use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five playstyle axes the player builds up through choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Reasoning things through.
    Analytical,
    /// Waiting, listening, letting others speak.
    Patience,
    /// Curiosity about the station and its people.
    Exploring,
    /// Putting others first.
    Helping,
    /// Making and fixing things.
    Building,
}

impl PatternKind {
    /// All pattern kinds in their canonical order.
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Analytical,
        PatternKind::Patience,
        PatternKind::Exploring,
        PatternKind::Helping,
        PatternKind::Building,
    ];

    /// The wire name of this pattern.
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Analytical => "analytical",
            PatternKind::Patience => "patience",
            PatternKind::Exploring => "exploring",
            PatternKind::Helping => "helping",
            PatternKind::Building => "building",
        }
    }

    /// Parse a wire name (case-sensitive, as stored).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five running pattern scores.
///
/// Scores are not clamped in either direction. Deltas saturate at the `i32`
/// limits so a pathological delta cannot overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patterns {
    /// Analytical score.
    pub analytical: i32,
    /// Patience score.
    pub patience: i32,
    /// Exploring score.
    pub exploring: i32,
    /// Helping score.
    pub helping: i32,
    /// Building score.
    pub building: i32,
}

impl Patterns {
    /// Read one score.
    pub fn get(&self, kind: PatternKind) -> i32 {
        match kind {
            PatternKind::Analytical => self.analytical,
            PatternKind::Patience => self.patience,
            PatternKind::Exploring => self.exploring,
            PatternKind::Helping => self.helping,
            PatternKind::Building => self.building,
        }
    }

    /// Overwrite one score.
    pub fn set(&mut self, kind: PatternKind, value: i32) {
        let slot = match kind {
            PatternKind::Analytical => &mut self.analytical,
            PatternKind::Patience => &mut self.patience,
            PatternKind::Exploring => &mut self.exploring,
            PatternKind::Helping => &mut self.helping,
            PatternKind::Building => &mut self.building,
        };
        *slot = value;
    }

    /// Add a delta to one score.
    pub fn add(&mut self, kind: PatternKind, delta: i32) {
        self.set(kind, self.get(kind).saturating_add(delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_names() {
        for kind in PatternKind::ALL {
            assert_eq!(PatternKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PatternKind::parse("Analytical"), None);
        assert_eq!(PatternKind::parse("courage"), None);
    }

    #[test]
    fn add_is_unclamped() {
        let mut p = Patterns {
            patience: 1,
            ..Patterns::default()
        };
        p.add(PatternKind::Patience, -5);
        assert_eq!(p.patience, -4);
        p.add(PatternKind::Analytical, 500);
        assert_eq!(p.analytical, 500);
    }

    #[test]
    fn add_saturates_instead_of_overflowing() {
        let mut p = Patterns::default();
        p.set(PatternKind::Building, i32::MAX);
        p.add(PatternKind::Building, 1);
        assert_eq!(p.building, i32::MAX);
    }

    #[test]
    fn serializes_with_named_fields() {
        let p = Patterns {
            analytical: 3,
            ..Patterns::default()
        };
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["analytical"], 3);
        assert_eq!(json["building"], 0);
    }
}
