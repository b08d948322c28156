use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tl_core::{GameState, GraphStore, NodeIndex};

use crate::config::SaveConfig;
use crate::error::{SaveError, SaveResult};
use crate::migrate::migrate;
use crate::outcome::{AutosaveOutcome, LoadOutcome, LoadReport, LoadedGame, SaveInspection, SaveSlot, SlotStatus};
use crate::recovery::restore_position;
use crate::storage::SaveStorage;
use crate::validate::{ValidationError, validate_save};
use crate::wire::SaveRecord;

/// Reads and writes saves for one graph store.
///
/// Every state handed out by [`load`](Self::load) and
/// [`import_save`](Self::import_save) is positioned on a node that exists in
/// the graph.
pub struct PersistenceManager<S: SaveStorage> {
    storage: S,
    graph: Arc<GraphStore>,
    config: SaveConfig,
    index: NodeIndex,
    last_autosave: Option<DateTime<Utc>>,
}

impl<S: SaveStorage> PersistenceManager<S> {
    /// Create a manager over `storage`.
    pub fn new(storage: S, graph: Arc<GraphStore>, config: SaveConfig) -> Self {
        Self {
            storage,
            graph,
            config,
            index: NodeIndex::new(),
            last_autosave: None,
        }
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the storage backend.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// The active configuration.
    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// The graph saves are checked against.
    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    /// Load the primary save, falling back to the backup.
    ///
    /// Never fails: anything unusable ends in [`LoadOutcome::NoSave`].
    pub fn load(&mut self) -> LoadOutcome {
        let primary_key = self.config.key(SaveSlot::Primary).to_string();
        match self.load_slot(SaveSlot::Primary) {
            Ok(Some(game)) => return LoadOutcome::Loaded(game),
            Ok(None) => {
                tracing::debug!(key = %primary_key, "no save found");
                return LoadOutcome::NoSave;
            }
            Err(e) => tracing::warn!(key = %primary_key, error = %e, "primary save unusable; trying backup"),
        }

        let backup_key = self.config.key(SaveSlot::Backup).to_string();
        match self.load_slot(SaveSlot::Backup) {
            Ok(Some(game)) => {
                tracing::warn!(key = %backup_key, "loaded backup save");
                LoadOutcome::Loaded(game)
            }
            Ok(None) => {
                tracing::warn!(key = %backup_key, "no backup save; starting fresh");
                LoadOutcome::NoSave
            }
            Err(e) => {
                tracing::warn!(key = %backup_key, error = %e, "backup save unusable; starting fresh");
                LoadOutcome::NoSave
            }
        }
    }

    /// Validate and write `state`, rotating the previous save into the
    /// backup slot and verifying the write by reading it back.
    ///
    /// Returns the state as written, with `last_saved` stamped. On error the
    /// previous save is still loadable.
    pub fn save(&mut self, state: &GameState) -> SaveResult<GameState> {
        let mut stamped = state.clone();
        stamped.last_saved = now_millis();

        let record = SaveRecord::from_state(&stamped);
        validate_save(&serde_json::to_value(&record)?)?;
        let json = serde_json::to_string(&record)?;

        let key = self.config.key(SaveSlot::Primary).to_string();
        let backup_key = self.config.key(SaveSlot::Backup).to_string();

        let previous = self.storage.read(&key)?;
        match &previous {
            Some(prev) if parse_record(prev).is_ok() => {
                self.storage.write(&backup_key, prev)?;
                tracing::debug!(key = %backup_key, "rotated previous save into backup");
            }
            Some(_) => tracing::warn!(key = %key, "previous save is invalid; keeping existing backup"),
            None => {}
        }

        self.storage.write(&key, &json)?;

        let written = self.storage.read(&key)?;
        if written.as_deref() != Some(json.as_str()) {
            let restored = match &previous {
                Some(prev) => self.storage.write(&key, prev),
                None => self.storage.remove(&key),
            };
            if let Err(e) = restored {
                tracing::warn!(key = %key, error = %e, "failed to restore previous save after verify mismatch");
            }
            tracing::warn!(key = %key, "save verification failed");
            return Err(SaveError::VerifyMismatch { key });
        }

        tracing::debug!(
            key = %key,
            node_id = %stamped.current_node_id,
            bytes = json.len(),
            "saved game"
        );
        Ok(stamped)
    }

    /// Save `state` unless the last autosave was less than
    /// [`SaveConfig::autosave_interval`] ago.
    pub fn autosave(&mut self, state: &GameState) -> SaveResult<AutosaveOutcome> {
        self.autosave_at(state, Utc::now())
    }

    /// [`autosave`](Self::autosave) with an explicit clock.
    ///
    /// A failed save does not count as an autosave, so the next call retries.
    pub fn autosave_at(&mut self, state: &GameState, now: DateTime<Utc>) -> SaveResult<AutosaveOutcome> {
        if let Some(last) = self.last_autosave
            && now - last < self.config.autosave_interval
        {
            tracing::debug!(since_last_ms = (now - last).num_milliseconds(), "autosave throttled");
            return Ok(AutosaveOutcome::Throttled);
        }
        let saved = self.save(state)?;
        self.last_autosave = Some(now);
        Ok(AutosaveOutcome::Saved(saved))
    }

    /// Whether a primary save exists.
    pub fn has_save(&self) -> SaveResult<bool> {
        Ok(self.storage.contains(self.config.key(SaveSlot::Primary))?)
    }

    /// Remove the primary and backup saves.
    pub fn delete_save(&mut self) -> SaveResult<()> {
        let key = self.config.key(SaveSlot::Primary).to_string();
        let backup_key = self.config.key(SaveSlot::Backup).to_string();
        self.storage.remove(&key)?;
        self.storage.remove(&backup_key)?;
        tracing::info!(key = %key, "deleted save and backup");
        Ok(())
    }

    /// Delete both saves and forget every cached lookup and the autosave
    /// clock.
    pub fn reset(&mut self) -> SaveResult<()> {
        self.delete_save()?;
        self.index.invalidate();
        self.last_autosave = None;
        Ok(())
    }

    /// The primary save as pretty JSON, or `None` when there is no save.
    pub fn export_save(&self) -> SaveResult<Option<String>> {
        let Some(raw) = self.storage.read(self.config.key(SaveSlot::Primary))? else {
            return Ok(None);
        };
        let record = parse_record(&raw)?;
        Ok(Some(serde_json::to_string_pretty(&record)?))
    }

    /// A live state as pretty JSON in the save schema.
    pub fn export_state(&self, state: &GameState) -> SaveResult<String> {
        let record = SaveRecord::from_state(state);
        validate_save(&serde_json::to_value(&record)?)?;
        Ok(serde_json::to_string_pretty(&record)?)
    }

    /// Restore a save from JSON and make it the primary save.
    ///
    /// Goes through the same validation, migration, and recovery as
    /// [`load`](Self::load). Invalid input leaves the current save untouched.
    pub fn import_save(&mut self, json: &str) -> SaveResult<LoadedGame> {
        let game = self.restore(json, SaveSlot::Import)?;
        let state = self.save(&game.state)?;
        tracing::info!(player_id = %state.player_id, "imported save");
        Ok(LoadedGame { state, ..game })
    }

    /// Status of the primary and backup slots.
    pub fn inspect(&self) -> SaveInspection {
        SaveInspection {
            primary: self.inspect_slot(SaveSlot::Primary),
            backup: self.inspect_slot(SaveSlot::Backup),
        }
    }

    fn inspect_slot(&self, slot: SaveSlot) -> (String, SlotStatus) {
        let key = self.config.key(slot).to_string();
        let status = match self.storage.read(&key) {
            Err(e) => SlotStatus::Unreadable(e.to_string()),
            Ok(None) => SlotStatus::Missing,
            Ok(Some(raw)) => match parse_record(&raw) {
                Err(e) => SlotStatus::Invalid(e.to_string()),
                Ok(record) => SlotStatus::Valid {
                    save_version: record.save_version,
                    player_id: record.player_id,
                    current_node_id: record.current_node_id,
                    current_character_id: record.current_character_id,
                    last_saved: record.last_saved,
                },
            },
        };
        (key, status)
    }

    fn load_slot(&mut self, slot: SaveSlot) -> SaveResult<Option<LoadedGame>> {
        let Some(raw) = self.storage.read(self.config.key(slot))? else {
            return Ok(None);
        };
        self.restore(&raw, slot).map(Some)
    }

    fn restore(&mut self, raw: &str, slot: SaveSlot) -> SaveResult<LoadedGame> {
        let mut record = parse_record(raw)?;
        let migrated_from = migrate(&mut record);
        let mut state = record.into_state(Utc::now());
        let position = restore_position(
            &mut state,
            &self.graph,
            &mut self.index,
            self.config.max_redirect_hops,
        )?;
        tracing::debug!(
            %slot,
            node_id = %state.current_node_id,
            character_id = %state.current_character_id,
            "restored save"
        );
        Ok(LoadedGame {
            state,
            slot,
            report: LoadReport {
                migrated_from,
                redirect: position.redirect,
                recovery: position.recovery,
            },
        })
    }
}

/// Parse and validate a stored save.
fn parse_record(raw: &str) -> Result<SaveRecord, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::new(format!("not valid JSON: {e}")))?;
    validate_save(&value)?;
    Ok(serde_json::from_value(value)?)
}

// Stored timestamps have millisecond precision; stamping at that precision
// keeps the returned state identical to what a later load produces.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use serde_json::json;

    use super::*;
    use crate::recovery::Recovery;
    use crate::storage::{FileStorage, MemoryStorage, StorageError};
    use tl_core::{PatternKind, StateChange, apply_state_change};

    const PRIMARY: &str = "grand-central-save-v1";
    const BACKUP: &str = "grand-central-save-v1-backup";

    const CONTENT: &str = r#"{
        "safeStart": { "characterId": "samuel", "nodeId": "samuel_introduction" },
        "characters": {
            "samuel": {
                "hub": "samuel_hub",
                "nodes": [{ "nodeId": "samuel_introduction" }, { "nodeId": "samuel_hub" }]
            },
            "maya": {
                "hub": "maya_hub",
                "nodes": [{ "nodeId": "maya_hub" }, { "nodeId": "maya_robotics" }]
            }
        },
        "redirects": {
            "maya_old_node": { "toNodeId": "maya_hub", "reason": "merged into hub" }
        }
    }"#;

    fn graph() -> Arc<GraphStore> {
        Arc::new(GraphStore::from_json(CONTENT).unwrap())
    }

    fn manager() -> PersistenceManager<MemoryStorage> {
        PersistenceManager::new(MemoryStorage::new(), graph(), SaveConfig::default())
    }

    fn progressed_state() -> GameState {
        let base = GameState::new_for_graph(&graph(), "0b6f4f3e-3c1a-4c8e-9d51-0f2a4d7f6a10");
        let change = StateChange::new()
            .with_trust("maya", 8)
            .with_knowledge("maya", "robotics")
            .with_pattern(PatternKind::Analytical, 3)
            .with_global_flag("met_maya");
        let mut state = apply_state_change(&base, &change);
        state.reposition("maya_robotics", "maya");
        state
    }

    fn raw_save(version: &str, player_id: &str, node: &str, character: &str) -> String {
        json!({
            "saveVersion": version,
            "playerId": player_id,
            "currentNodeId": node,
            "currentCharacterId": character,
            "patterns": { "analytical": 3, "patience": 0, "exploring": 0, "helping": 0, "building": 0 },
            "characters": [{ "characterId": "maya", "trust": 8, "knowledgeFlags": ["robotics"] }],
            "globalFlags": ["met_maya"],
            "lastSaved": 1_700_000_000_000_i64
        })
        .to_string()
    }

    fn loaded(mgr: &mut PersistenceManager<MemoryStorage>) -> LoadedGame {
        match mgr.load() {
            LoadOutcome::Loaded(game) => game,
            LoadOutcome::NoSave => panic!("expected a loaded save"),
        }
    }

    #[test]
    fn empty_storage_loads_nothing() {
        let mut mgr = manager();
        assert_eq!(mgr.load(), LoadOutcome::NoSave);
        assert!(!mgr.has_save().unwrap());
        assert_eq!(mgr.export_save().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut mgr = manager();
        let state = progressed_state();
        let saved = mgr.save(&state).unwrap();
        assert!(saved.last_saved >= state.last_saved - TimeDelta::milliseconds(1));

        let game = loaded(&mut mgr);
        assert_eq!(game.slot, SaveSlot::Primary);
        assert!(game.report.is_clean());
        assert_eq!(game.state.current_node_id, "maya_robotics");
        assert_eq!(game.state.patterns, state.patterns);
        assert_eq!(game.state.characters, state.characters);
        assert_eq!(game.state.global_flags, state.global_flags);
        assert_eq!(game.state.mysteries, state.mysteries);
        assert_eq!(game.state.last_saved, saved.last_saved);
    }

    #[test]
    fn redirected_node_loads_at_target() {
        let mut mgr = manager();
        mgr.storage_mut()
            .insert_raw(PRIMARY, raw_save("1.2.0", "p", "maya_old_node", "maya"));

        let game = loaded(&mut mgr);
        assert_eq!(game.state.current_node_id, "maya_hub");
        assert_eq!(game.state.current_character_id, "maya");
        let redirect = game.report.redirect.unwrap();
        assert_eq!(redirect.path, ["maya_old_node", "maya_hub"]);
        assert!(redirect.is_clean());
        assert_eq!(game.report.recovery, None);
    }

    #[test]
    fn missing_node_recovers_with_progress() {
        let mut mgr = manager();
        mgr.storage_mut()
            .insert_raw(PRIMARY, raw_save("1.2.0", "p", "maya_deleted_scene", "maya"));

        let game = loaded(&mut mgr);
        assert_eq!(game.state.current_node_id, "maya_hub");
        assert_eq!(game.state.trust("maya"), 8);
        assert_eq!(game.state.patterns.analytical, 3);
        assert!(game.state.has_global_flag("met_maya"));
        assert!(matches!(game.report.recovery, Some(Recovery::CharacterHub { .. })));
    }

    #[test]
    fn missing_character_recovers_to_safe_start() {
        let mut mgr = manager();
        mgr.storage_mut()
            .insert_raw(PRIMARY, raw_save("1.2.0", "p", "devon_hub", "devon"));

        let game = loaded(&mut mgr);
        assert_eq!(game.state.current_node_id, "samuel_introduction");
        assert_eq!(game.state.current_character_id, "samuel");
        assert_eq!(game.state.trust("maya"), 8);
        assert!(matches!(game.report.recovery, Some(Recovery::SafeStart { .. })));
    }

    #[test]
    fn failed_write_keeps_prior_save() {
        let mut mgr = manager();
        let first = mgr.save(&progressed_state()).unwrap();

        let mut next = first.clone();
        next.reposition("maya_hub", "maya");
        mgr.storage_mut().fail_next_write(PRIMARY);
        assert!(matches!(
            mgr.save(&next),
            Err(SaveError::Storage(StorageError::QuotaExceeded { .. }))
        ));

        let game = loaded(&mut mgr);
        assert_eq!(game.state.current_node_id, "maya_robotics");
        assert_eq!(game.state.last_saved, first.last_saved);
    }

    #[test]
    fn verify_mismatch_restores_prior_save() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        let before = mgr.storage().get(PRIMARY).map(str::to_string);

        let mut next = progressed_state();
        next.reposition("maya_hub", "maya");
        mgr.storage_mut().corrupt_next_write(PRIMARY);
        assert!(matches!(mgr.save(&next), Err(SaveError::VerifyMismatch { .. })));

        assert_eq!(mgr.storage().get(PRIMARY).map(str::to_string), before);
        assert_eq!(loaded(&mut mgr).state.current_node_id, "maya_robotics");
    }

    #[test]
    fn verify_mismatch_on_first_save_leaves_no_save() {
        let mut mgr = manager();
        mgr.storage_mut().corrupt_next_write(PRIMARY);
        assert!(mgr.save(&progressed_state()).is_err());
        assert_eq!(mgr.load(), LoadOutcome::NoSave);
    }

    #[test]
    fn save_rotates_previous_into_backup() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        assert_eq!(mgr.storage().get(BACKUP), None);
        let first = mgr.storage().get(PRIMARY).map(str::to_string);

        let mut next = progressed_state();
        next.reposition("maya_hub", "maya");
        mgr.save(&next).unwrap();
        assert_eq!(mgr.storage().get(BACKUP).map(str::to_string), first);
    }

    #[test]
    fn invalid_primary_is_not_rotated() {
        let mut mgr = manager();
        mgr.storage_mut().insert_raw(BACKUP, raw_save("1.2.0", "p", "maya_hub", "maya"));
        mgr.storage_mut().insert_raw(PRIMARY, "{\"saveVersion\":");
        mgr.save(&progressed_state()).unwrap();

        let backup: Value = serde_json::from_str(mgr.storage().get(BACKUP).unwrap()).unwrap();
        assert_eq!(backup["currentNodeId"], "maya_hub");
    }

    #[test]
    fn corrupt_primary_falls_back_to_backup() {
        let mut mgr = manager();
        mgr.storage_mut().insert_raw(PRIMARY, "{ truncated");
        mgr.storage_mut()
            .insert_raw(BACKUP, raw_save("1.2.0", "p", "maya_hub", "maya"));

        let game = loaded(&mut mgr);
        assert_eq!(game.slot, SaveSlot::Backup);
        assert_eq!(game.state.trust("maya"), 8);
    }

    #[test]
    fn unreadable_primary_falls_back_to_backup() {
        let mut mgr = manager();
        mgr.storage_mut()
            .insert_raw(PRIMARY, raw_save("1.2.0", "p", "maya_hub", "maya"));
        mgr.storage_mut()
            .insert_raw(BACKUP, raw_save("1.2.0", "p", "samuel_hub", "samuel"));
        mgr.storage_mut().fail_reads_for(PRIMARY);

        let game = loaded(&mut mgr);
        assert_eq!(game.slot, SaveSlot::Backup);
        assert_eq!(game.state.current_node_id, "samuel_hub");
    }

    #[test]
    fn both_slots_invalid_is_no_save() {
        let mut mgr = manager();
        let mut out_of_range: Value = serde_json::from_str(&raw_save("1.2.0", "p", "maya_hub", "maya")).unwrap();
        out_of_range["characters"][0]["trust"] = json!(42);
        mgr.storage_mut().insert_raw(PRIMARY, out_of_range.to_string());
        mgr.storage_mut().insert_raw(BACKUP, "not json at all");

        assert_eq!(mgr.load(), LoadOutcome::NoSave);
    }

    #[test]
    fn overflowing_pattern_in_primary_falls_back_to_backup() {
        let mut mgr = manager();
        let mut extreme: Value = serde_json::from_str(&raw_save("1.2.0", "p", "maya_hub", "maya")).unwrap();
        extreme["patterns"]["analytical"] = json!(i64::MIN);
        mgr.storage_mut().insert_raw(PRIMARY, extreme.to_string());
        mgr.storage_mut()
            .insert_raw(BACKUP, raw_save("1.2.0", "p", "samuel_hub", "samuel"));

        let game = loaded(&mut mgr);
        assert_eq!(game.slot, SaveSlot::Backup);
        assert_eq!(game.state.current_node_id, "samuel_hub");

        mgr.storage_mut().remove(BACKUP).unwrap();
        assert_eq!(mgr.load(), LoadOutcome::NoSave);
    }

    #[test]
    fn large_pattern_scores_stay_saveable() {
        let mut mgr = manager();
        let mut state = progressed_state();
        state.patterns.helping = 10_001;
        state.patterns.patience = i32::MIN;
        let change = StateChange::new().with_pattern(PatternKind::Building, i32::MAX);
        let state = apply_state_change(&apply_state_change(&state, &change), &change);

        mgr.save(&state).unwrap();
        let game = loaded(&mut mgr);
        assert_eq!(game.state.patterns.helping, 10_001);
        assert_eq!(game.state.patterns.patience, i32::MIN);
        assert_eq!(game.state.patterns.building, i32::MAX);
    }

    #[test]
    fn legacy_save_is_migrated_on_load() {
        let mut mgr = manager();
        mgr.storage_mut()
            .insert_raw(PRIMARY, raw_save("1.0.0", "player_1699999999", "maya_hub", "maya"));

        let game = loaded(&mut mgr);
        assert_eq!(game.report.migrated_from.as_deref(), Some("1.0.0"));
        assert_eq!(game.state.save_version, tl_core::CURRENT_SAVE_VERSION);
        assert!(uuid::Uuid::parse_str(&game.state.player_id).is_ok());
        assert_eq!(game.state.mystery("platform_seven"), Some("stable"));

        // The same legacy id always maps to the same player.
        let again = loaded(&mut mgr);
        assert_eq!(again.state.player_id, game.state.player_id);
    }

    #[test]
    fn autosave_is_throttled() {
        let mut mgr = manager();
        let state = progressed_state();
        let t0 = Utc::now();

        assert!(matches!(mgr.autosave_at(&state, t0).unwrap(), AutosaveOutcome::Saved(_)));
        assert_eq!(
            mgr.autosave_at(&state, t0 + TimeDelta::seconds(10)).unwrap(),
            AutosaveOutcome::Throttled
        );
        assert!(matches!(
            mgr.autosave_at(&state, t0 + TimeDelta::seconds(31)).unwrap(),
            AutosaveOutcome::Saved(_)
        ));
        assert_eq!(mgr.storage().write_count(), 3);
    }

    #[test]
    fn failed_autosave_does_not_advance_throttle() {
        let mut mgr = manager();
        let state = progressed_state();
        let t0 = Utc::now();

        mgr.storage_mut().fail_next_write(PRIMARY);
        assert!(mgr.autosave_at(&state, t0).is_err());
        assert!(matches!(
            mgr.autosave_at(&state, t0 + TimeDelta::seconds(1)).unwrap(),
            AutosaveOutcome::Saved(_)
        ));
    }

    #[test]
    fn import_rejects_invalid_json_and_keeps_save() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        let before = mgr.storage().get(PRIMARY).map(str::to_string);

        assert!(matches!(mgr.import_save("{ nope"), Err(SaveError::Validation(_))));
        let mut bad: Value = serde_json::from_str(&raw_save("1.2.0", "p", "maya_hub", "maya")).unwrap();
        bad["patterns"]["courage"] = json!(5);
        assert!(matches!(
            mgr.import_save(&bad.to_string()),
            Err(SaveError::Validation(_))
        ));

        assert_eq!(mgr.storage().get(PRIMARY).map(str::to_string), before);
    }

    #[test]
    fn import_migrates_recovers_and_saves() {
        let mut mgr = manager();
        let game = mgr
            .import_save(&raw_save("1.0.0", "player_7", "maya_old_node", "maya"))
            .unwrap();

        assert_eq!(game.slot, SaveSlot::Import);
        assert_eq!(game.state.current_node_id, "maya_hub");
        assert_eq!(game.report.migrated_from.as_deref(), Some("1.0.0"));

        let stored = loaded(&mut mgr);
        assert!(stored.report.is_clean());
        assert_eq!(stored.state.player_id, game.state.player_id);
    }

    #[test]
    fn export_round_trips_through_import() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        let exported = mgr.export_save().unwrap().unwrap();
        assert!(exported.contains("\"saveVersion\": \"1.2.0\""));

        let mut other = manager();
        let game = other.import_save(&exported).unwrap();
        assert_eq!(game.state.trust("maya"), 8);
        assert_eq!(game.state.current_node_id, "maya_robotics");
    }

    #[test]
    fn export_state_matches_schema() {
        let mgr = manager();
        let json = mgr.export_state(&progressed_state()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        validate_save(&value).unwrap();
        assert_eq!(value["currentCharacterId"], "maya");
    }

    #[test]
    fn reset_removes_both_slots() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        mgr.save(&progressed_state()).unwrap();
        assert!(mgr.has_save().unwrap());

        mgr.reset().unwrap();
        assert!(!mgr.has_save().unwrap());
        assert_eq!(mgr.storage().get(BACKUP), None);
        assert_eq!(mgr.load(), LoadOutcome::NoSave);
    }

    #[test]
    fn inspect_reports_each_slot() {
        let mut mgr = manager();
        mgr.save(&progressed_state()).unwrap();
        mgr.storage_mut().insert_raw(BACKUP, "garbage");

        let inspection = mgr.inspect();
        assert_eq!(inspection.primary.0, PRIMARY);
        assert!(matches!(
            inspection.primary.1,
            SlotStatus::Valid { ref current_node_id, .. } if current_node_id == "maya_robotics"
        ));
        assert!(matches!(inspection.backup.1, SlotStatus::Invalid(_)));

        mgr.storage_mut().fail_reads_for(BACKUP);
        assert!(matches!(mgr.inspect().backup.1, SlotStatus::Unreadable(_)));
    }

    #[test]
    fn file_storage_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path()).unwrap();
        let config = SaveConfig::default().with_storage_key("slot-1");
        let mut mgr = PersistenceManager::new(storage, graph(), config);

        mgr.save(&progressed_state()).unwrap();
        assert!(tmp.path().join("slot-1.json").exists());

        let game = mgr.load().loaded().unwrap();
        assert_eq!(game.state.trust("maya"), 8);
    }
}
