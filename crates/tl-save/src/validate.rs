use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use tl_core::{MAX_TRUST, MIN_TRUST, PatternKind};

use crate::migrate::parse_version;

/// A save that failed validation, with every problem found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    problems: Vec<String>,
}

impl ValidationError {
    /// A single-problem error.
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }

    /// Every problem found.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.problems.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("schema mismatch: {e}"))
    }
}

/// Check that `value` has the shape of a save.
///
/// Runs on the raw JSON before typed parsing and reports every problem
/// found, not just the first.
pub fn validate_save(value: &Value) -> Result<(), ValidationError> {
    let Some(obj) = value.as_object() else {
        return Err(ValidationError::new("save is not a JSON object"));
    };

    let mut problems = Vec::new();

    match obj.get("saveVersion").and_then(Value::as_str) {
        Some(v) if parse_version(v).is_some() => {}
        Some(v) => problems.push(format!("saveVersion '{v}' is not MAJOR.MINOR.PATCH")),
        None => problems.push("saveVersion must be a string".to_string()),
    }
    for field in ["playerId", "currentNodeId", "currentCharacterId"] {
        require_non_empty_string(obj, field, &mut problems);
    }

    check_patterns(obj.get("patterns"), &mut problems);
    check_characters(obj.get("characters"), &mut problems);
    check_string_array(obj.get("globalFlags"), "globalFlags", &mut problems);

    match obj.get("mysteries") {
        None => {}
        Some(Value::Object(m)) => {
            for (name, v) in m {
                if !v.is_string() {
                    problems.push(format!("mysteries.{name} must be a string"));
                }
            }
        }
        Some(_) => problems.push("mysteries must be an object".to_string()),
    }

    if !obj.get("lastSaved").is_some_and(is_timestamp) {
        problems.push("lastSaved must be a non-negative integer timestamp".to_string());
    }
    if obj.get("sessionStartTime").is_some_and(|v| !is_timestamp(v)) {
        problems.push("sessionStartTime must be a non-negative integer timestamp".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}

fn require_non_empty_string(obj: &Map<String, Value>, field: &str, problems: &mut Vec<String>) {
    match obj.get(field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        Some(_) => problems.push(format!("{field} must not be empty")),
        None => problems.push(format!("{field} must be a string")),
    }
}

fn is_timestamp(v: &Value) -> bool {
    v.as_i64().is_some_and(|n| n >= 0)
}

fn check_patterns(value: Option<&Value>, problems: &mut Vec<String>) {
    let Some(patterns) = value.and_then(Value::as_object) else {
        problems.push("patterns must be an object".to_string());
        return;
    };
    for kind in PatternKind::ALL {
        match patterns.get(kind.as_str()).map(Value::as_i64) {
            None => problems.push(format!("patterns.{kind} is missing")),
            Some(None) => problems.push(format!("patterns.{kind} must be an integer")),
            Some(Some(n)) if i32::try_from(n).is_err() => {
                problems.push(format!("patterns.{kind} = {n} is out of range"));
            }
            Some(Some(_)) => {}
        }
    }
    for name in patterns.keys() {
        if PatternKind::parse(name).is_none() {
            problems.push(format!("patterns.{name} is not a known pattern"));
        }
    }
}

fn check_characters(value: Option<&Value>, problems: &mut Vec<String>) {
    let Some(characters) = value.and_then(Value::as_array) else {
        problems.push("characters must be an array".to_string());
        return;
    };
    let mut seen = HashSet::new();
    for (i, entry) in characters.iter().enumerate() {
        let Some(c) = entry.as_object() else {
            problems.push(format!("characters[{i}] must be an object"));
            continue;
        };
        match c.get("characterId").and_then(Value::as_str) {
            Some(id) if id.is_empty() => problems.push(format!("characters[{i}].characterId is empty")),
            Some(id) if !seen.insert(id) => {
                problems.push(format!("characters[{i}].characterId '{id}' is duplicated"));
            }
            Some(_) => {}
            None => problems.push(format!("characters[{i}].characterId must be a string")),
        }
        match c.get("trust").and_then(Value::as_i64) {
            Some(t) if (i64::from(MIN_TRUST)..=i64::from(MAX_TRUST)).contains(&t) => {}
            Some(t) => problems.push(format!("characters[{i}].trust = {t} is out of range")),
            None => problems.push(format!("characters[{i}].trust must be an integer")),
        }
        check_string_array(
            c.get("knowledgeFlags"),
            &format!("characters[{i}].knowledgeFlags"),
            problems,
        );
    }
}

fn check_string_array(value: Option<&Value>, field: &str, problems: &mut Vec<String>) {
    match value.and_then(Value::as_array) {
        Some(items) => {
            if items.iter().any(|v| !v.is_string()) {
                problems.push(format!("{field} must contain only strings"));
            }
        }
        None => problems.push(format!("{field} must be an array")),
    }
}
