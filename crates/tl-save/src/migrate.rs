use tl_core::CURRENT_SAVE_VERSION;
use tl_core::state::DEFAULT_MYSTERIES;
use uuid::Uuid;

use crate::wire::SaveRecord;

/// A `MAJOR.MINOR.PATCH` triple, compared lexicographically.
pub type Version = (u64, u64, u64);

struct Migration {
    target: &'static str,
    apply: fn(&mut SaveRecord),
}

// Ordered by target. Each step must be idempotent.
const MIGRATIONS: &[Migration] = &[
    Migration {
        target: "1.1.0",
        apply: normalize_player_id,
    },
    Migration {
        target: "1.2.0",
        apply: fill_default_mysteries,
    },
];

/// Parse `MAJOR.MINOR.PATCH`. A leading `v` is accepted.
pub fn parse_version(v: &str) -> Option<Version> {
    let mut iter = v.trim().trim_start_matches('v').split('.');
    let maj = iter.next()?.parse::<u64>().ok()?;
    let min = iter.next()?.parse::<u64>().ok()?;
    let pat = iter.next()?.parse::<u64>().ok()?;
    if iter.next().is_some() {
        return None;
    }
    Some((maj, min, pat))
}

/// Bring `record` up to [`CURRENT_SAVE_VERSION`].
///
/// Returns the version the record was migrated from, or `None` when it was
/// already current (or newer, in which case it is left untouched).
pub fn migrate(record: &mut SaveRecord) -> Option<String> {
    let current = parse_version(CURRENT_SAVE_VERSION)?;
    // Validation has already rejected unparsable versions; treat one that
    // slips through as the oldest possible save.
    let from = parse_version(&record.save_version).unwrap_or_default();

    if from > current {
        tracing::warn!(
            version = %record.save_version,
            current = CURRENT_SAVE_VERSION,
            "save is newer than this build; loading as-is"
        );
        return None;
    }
    if from == current {
        return None;
    }

    let original = record.save_version.clone();
    for migration in MIGRATIONS {
        let Some(target) = parse_version(migration.target) else {
            continue;
        };
        if from < target {
            tracing::debug!(target = migration.target, "applying save migration");
            (migration.apply)(record);
        }
    }
    record.save_version = CURRENT_SAVE_VERSION.to_string();
    tracing::info!(from = %original, to = CURRENT_SAVE_VERSION, "migrated save");
    Some(original)
}

/// The UUID a legacy player id maps to. Stable across runs.
pub fn legacy_player_uuid(legacy_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, legacy_id.as_bytes())
}

fn normalize_player_id(record: &mut SaveRecord) {
    if Uuid::parse_str(&record.player_id).is_ok() {
        return;
    }
    let normalized = legacy_player_uuid(&record.player_id).to_string();
    tracing::info!(legacy = %record.player_id, player_id = %normalized, "normalized legacy player id");
    record.player_id = normalized;
}

fn fill_default_mysteries(record: &mut SaveRecord) {
    for (name, value) in DEFAULT_MYSTERIES {
        record
            .mysteries
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tl_core::Patterns;

    fn record(version: &str, player_id: &str) -> SaveRecord {
        SaveRecord {
            save_version: version.to_string(),
            player_id: player_id.to_string(),
            current_node_id: "samuel_introduction".to_string(),
            current_character_id: "samuel".to_string(),
            patterns: Patterns::default(),
            characters: Vec::new(),
            global_flags: Vec::new(),
            mysteries: [("platform_seven".to_string(), "flickering".to_string())]
                .into_iter()
                .collect(),
            last_saved: Utc::now(),
            session_start_time: Utc::now(),
        }
    }

    #[test]
    fn parses_versions() {
        assert_eq!(parse_version("1.2.0"), Some((1, 2, 0)));
        assert_eq!(parse_version("v10.0.3"), Some((10, 0, 3)));
        assert_eq!(parse_version("1.2"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("one.two.three"), None);
        assert!(parse_version("1.10.0") > parse_version("1.9.0"));
    }

    #[test]
    fn legacy_save_is_fully_migrated() {
        let mut rec = record("1.0.0", "player_1699999999");
        assert_eq!(migrate(&mut rec).as_deref(), Some("1.0.0"));

        assert_eq!(rec.save_version, CURRENT_SAVE_VERSION);
        assert!(Uuid::parse_str(&rec.player_id).is_ok());
        assert_eq!(rec.player_id, legacy_player_uuid("player_1699999999").to_string());
        assert_eq!(rec.mysteries["platform_seven"], "flickering");
        assert_eq!(rec.mysteries["samuels_past"], "hidden");
        assert_eq!(rec.mysteries.len(), DEFAULT_MYSTERIES.len());
    }

    #[test]
    fn migration_is_idempotent() {
        let mut once = record("1.0.0", "player_42");
        migrate(&mut once);
        let mut twice = once.clone();
        assert_eq!(migrate(&mut twice), None);
        assert_eq!(once, twice);

        // Re-running each step directly changes nothing either.
        normalize_player_id(&mut twice);
        fill_default_mysteries(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn uuid_player_ids_are_kept() {
        let id = "0b6f4f3e-3c1a-4c8e-9d51-0f2a4d7f6a10";
        let mut rec = record("1.0.0", id);
        migrate(&mut rec);
        assert_eq!(rec.player_id, id);
    }

    #[test]
    fn only_later_steps_run() {
        let mut rec = record("1.1.0", "not-a-uuid");
        assert_eq!(migrate(&mut rec).as_deref(), Some("1.1.0"));
        assert_eq!(rec.player_id, "not-a-uuid");
        assert_eq!(rec.mysteries.len(), DEFAULT_MYSTERIES.len());
    }

    #[test]
    fn newer_saves_are_untouched() {
        let mut rec = record("9.0.0", "player_1");
        let before = rec.clone();
        assert_eq!(migrate(&mut rec), None);
        assert_eq!(rec, before);
    }
}
