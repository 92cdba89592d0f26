//! Versioned storage record for the tournament store.
//!
//! The record lives under [`STORAGE_KEY`] as `{"state": {...}, "version": 0}`
//! with the field names earlier installations already use, so existing data
//! keeps loading. The running flag is never written: a reload always comes
//! back paused.
//!
//! Loading never fails. Each field is decoded on its own and falls back to
//! its default when it is missing or malformed; a missing or unreadable record
//! yields a fresh store.

use crate::config::{MAX_BACKGROUND_IMAGE_BYTES, STORAGE_ENVELOPE_VERSION, STORAGE_KEY};
use crate::display::DisplaySettings;
use crate::error::{Result, StoreError};
use crate::level::{count_from_value, LevelSequence};
use crate::metrics::PlayerState;
use crate::prizes::PrizeList;
use crate::snapshot::TournamentSnapshot;
use crate::store::{StoreParts, TournamentStore};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;

/// Minimal string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| StoreError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Storage("localStorage disabled".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StoreError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Storage(format!("{:?}", e)))
    }
}

/// In-memory storage for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedPlayers<'a> {
    #[serde(flatten)]
    state: &'a PlayerState,
    current_players: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState<'a> {
    blind_levels: &'a LevelSequence,
    current_level: usize,
    saved_tournaments: &'a [TournamentSnapshot],
    tournament_name: &'a str,
    display_settings: &'a DisplaySettings,
    player_state: PersistedPlayers<'a>,
    current_time: u32,
    is_break: bool,
    prizes: &'a PrizeList,
}

/// Serialize the persisted subset of `store` into the storage envelope.
pub fn encode(store: &TournamentStore) -> Result<String> {
    let image_len = store.display().background_image.len();
    if image_len > MAX_BACKGROUND_IMAGE_BYTES {
        warn!(
            "Background image is {:.2} KB, localStorage may refuse it",
            image_len as f64 / 1024.0
        );
    }

    let envelope = Envelope {
        state: PersistedState {
            blind_levels: store.levels(),
            current_level: store.current_level_index(),
            saved_tournaments: store.snapshots(),
            tournament_name: store.tournament_name(),
            display_settings: store.display(),
            player_state: PersistedPlayers {
                state: store.players(),
                current_players: store.player_stats().current_players,
            },
            current_time: store.remaining_seconds(),
            is_break: store.is_break(),
            prizes: store.prize_list(),
        },
        version: STORAGE_ENVELOPE_VERSION,
    };
    serde_json::to_string(&envelope).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Rebuild a store from a raw record, defaulting field by field.
pub fn decode(raw: &str) -> TournamentStore {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("Stored state is not valid JSON, starting fresh: {}", e);
            return TournamentStore::default();
        }
    };

    let Some(root) = value.as_object() else {
        warn!("Stored state is not an object, starting fresh");
        return TournamentStore::default();
    };
    // Accept both the enveloped record and a bare state object.
    let state = root
        .get("state")
        .and_then(Value::as_object)
        .unwrap_or(root);

    let mut prizes: PrizeList = field(state, "prizes").unwrap_or_default();
    if prizes.is_empty() {
        prizes = PrizeList::default();
    }

    TournamentStore::from_parts(StoreParts {
        levels: field(state, "blindLevels").unwrap_or_default(),
        current_level_index: state
            .get("currentLevel")
            .and_then(count_from_value)
            .unwrap_or(0) as usize,
        remaining_seconds: state
            .get("currentTime")
            .and_then(count_from_value)
            .map(|s| s.min(u32::MAX as u64) as u32),
        snapshots: snapshots(state),
        tournament_name: field(state, "tournamentName").unwrap_or_default(),
        display: field(state, "displaySettings").unwrap_or_default(),
        players: field(state, "playerState").unwrap_or_default(),
        prizes,
    })
}

fn field<T: DeserializeOwned>(state: &Map<String, Value>, name: &str) -> Option<T> {
    let value = state.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring stored field '{}': {}", name, e);
            None
        }
    }
}

/// Saved tournaments, skipping individual entries that no longer parse.
fn snapshots(state: &Map<String, Value>) -> Vec<TournamentSnapshot> {
    let Some(entries) = state.get("savedTournaments").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Dropping unreadable saved tournament: {}", e);
                None
            }
        })
        .collect()
}

/// Read the store from `storage`, falling back to defaults on any failure.
pub fn load(storage: &impl KeyValueStore) -> TournamentStore {
    match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => {
            let store = decode(&raw);
            info!(
                "Restored tournament state: {} levels, level {}",
                store.levels().len(),
                store.current_level_index() + 1
            );
            store
        }
        Ok(None) => {
            debug!("No stored state under {}, using defaults", STORAGE_KEY);
            TournamentStore::default()
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            TournamentStore::default()
        }
    }
}

pub fn save(storage: &impl KeyValueStore, store: &TournamentStore) -> Result<()> {
    let raw = encode(store)?;
    storage.set(STORAGE_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, LevelDraft};
    use crate::prizes::{PrizeAmount, PrizeType};

    #[test]
    fn missing_record_loads_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(load(&storage), TournamentStore::default());
    }

    #[test]
    fn garbage_loads_defaults() {
        assert_eq!(decode("not json"), TournamentStore::default());
        assert_eq!(decode("[1,2,3]"), TournamentStore::default());
    }

    #[test]
    fn round_trip_keeps_state_but_not_running_flag() {
        let mut store = TournamentStore::default();
        store.replace_sequence(
            [Level::blinds(100, 200, 0, 20), Level::break_of(10)]
                .into_iter()
                .map(LevelDraft::from),
        );
        store.set_tournament_name("Friday");
        store.save_snapshot_at("Friday", 5).unwrap();
        store.set_prize_type(1, PrizeType::Item).unwrap();
        store
            .set_prize_amount(1, PrizeAmount::Text("Trophy".into()))
            .unwrap();
        store.start();
        store.tick();
        store.tick();

        let storage = MemoryStorage::new();
        save(&storage, &store).unwrap();
        let restored = load(&storage);

        assert!(!restored.is_running());
        assert_eq!(restored.remaining_seconds(), 1198);
        assert_eq!(restored.levels(), store.levels());
        assert_eq!(restored.snapshots(), store.snapshots());
        assert_eq!(restored.tournament_name(), "Friday");
        assert_eq!(restored.prizes(), store.prizes());
    }

    #[test]
    fn record_uses_envelope_and_legacy_field_names() {
        let raw = encode(&TournamentStore::default()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        let state = &value["state"];
        for key in [
            "blindLevels",
            "currentLevel",
            "savedTournaments",
            "tournamentName",
            "displaySettings",
            "playerState",
            "currentTime",
            "isBreak",
            "prizes",
        ] {
            assert!(state.get(key).is_some(), "missing {}", key);
        }
        assert!(state.get("isRunning").is_none());
        assert_eq!(state["playerState"]["currentPlayers"], 0);
        assert_eq!(state["currentTime"], 1200);
    }

    #[test]
    fn each_field_falls_back_independently() {
        let raw = r#"{"state":{
            "blindLevels":"broken",
            "currentLevel":3,
            "tournamentName":42,
            "playerState":{"initialPlayers":12},
            "savedTournaments":[{"id":"1","name":"ok","blindLevels":[{"duration":5}]},{"nope":true}],
            "prizes":[]
        },"version":0}"#;
        let store = decode(raw);
        assert_eq!(store.levels(), &LevelSequence::default());
        assert_eq!(store.current_level_index(), 3);
        assert_eq!(store.remaining_seconds(), 1200);
        assert_eq!(store.tournament_name(), "");
        assert_eq!(store.players().initial_players, 12);
        assert_eq!(store.players().initial_stack, 20_000);
        assert_eq!(store.snapshots().len(), 1);
        assert_eq!(store.prizes().len(), 3);
    }

    #[test]
    fn restored_cursor_is_clamped_into_the_structure() {
        let raw = r#"{"state":{"blindLevels":[{"smallBlind":1,"bigBlind":2,"duration":1}],
                     "currentLevel":40,"currentTime":999999}}"#;
        let store = decode(raw);
        assert_eq!(store.current_level_index(), 0);
        assert_eq!(store.remaining_seconds(), 60);
    }

    #[test]
    fn bare_state_object_is_accepted() {
        let raw = r#"{"tournamentName":"Bare","currentTime":30}"#;
        let store = decode(raw);
        assert_eq!(store.tournament_name(), "Bare");
        assert_eq!(store.remaining_seconds(), 30);
    }
}
