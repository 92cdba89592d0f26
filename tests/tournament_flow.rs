use blind_clock::metrics::PlayerStatePatch;
use blind_clock::persistence::{self, KeyValueStore, MemoryStorage};
use blind_clock::{Level, LevelDraft, LevelSequence, NextBreak, TimerEvent, TournamentStore};

fn short_structure() -> TournamentStore {
    TournamentStore::with_levels(LevelSequence::from_drafts(
        [
            Level::blinds(25, 50, 0, 1),
            Level::blinds(50, 100, 100, 1),
            Level::break_of(1),
            Level::blinds(100, 200, 200, 1),
        ]
        .into_iter()
        .map(LevelDraft::from),
    ))
}

fn assert_consistent(store: &TournamentStore) {
    assert!(store.current_level_index() < store.levels().len());
    assert!(store.remaining_seconds() <= store.current_level().duration_seconds());
    for (i, level) in store.levels().iter().enumerate() {
        assert_eq!(level.id, i);
    }
}

#[test]
fn clock_runs_through_every_level_and_stops_at_the_end() {
    let mut store = short_structure();
    store.start();

    let mut events = Vec::new();
    for _ in 0..(4 * 60 + 10) {
        if let Some(event) = store.tick() {
            events.push(event);
        }
        assert_consistent(&store);
    }

    assert_eq!(
        events,
        vec![
            TimerEvent::LevelExpired { level_index: 0, final_level: false },
            TimerEvent::LevelAdvanced { from: 0, to: 1 },
            TimerEvent::LevelExpired { level_index: 1, final_level: false },
            TimerEvent::LevelAdvanced { from: 1, to: 2 },
            TimerEvent::LevelExpired { level_index: 2, final_level: false },
            TimerEvent::LevelAdvanced { from: 2, to: 3 },
            TimerEvent::LevelExpired { level_index: 3, final_level: true },
        ]
    );
    assert_eq!(store.current_level_index(), 3);
    assert_eq!(store.remaining_seconds(), 0);
}

#[test]
fn next_break_counts_down_and_reports_in_progress() {
    let mut store = short_structure();
    assert_eq!(store.next_break(), NextBreak::In(120));
    store.start();
    for _ in 0..30 {
        store.tick();
    }
    assert_eq!(store.next_break_seconds(), 90);

    store.next_level();
    store.next_level();
    assert!(store.is_break());
    assert_eq!(store.next_break(), NextBreak::InProgress);

    store.next_level();
    assert_eq!(store.next_break(), NextBreak::NoBreak);
    assert_eq!(store.next_break_seconds(), -1);
}

#[test]
fn saved_state_survives_a_reload_paused() {
    let storage = MemoryStorage::new();
    let mut store = short_structure();
    store.set_tournament_name("Friday Deepstack");
    store.update_player_state(PlayerStatePatch {
        initial_players: Some(9),
        rebuys: Some(1),
        players_out: Some(2),
        ..Default::default()
    });
    store.start();
    for _ in 0..75 {
        store.tick();
    }
    store.save_snapshot_at("Friday Deepstack", 1_700_000_000_000).unwrap();
    persistence::save(&storage, &store).unwrap();

    let restored = persistence::load(&storage);
    assert!(!restored.is_running());
    assert_eq!(restored.current_level_index(), 1);
    assert_eq!(restored.remaining_seconds(), store.remaining_seconds());
    assert_eq!(restored.levels(), store.levels());
    assert_eq!(restored.tournament_name(), "Friday Deepstack");
    assert_eq!(restored.player_stats().current_players, 8);
    assert_eq!(restored.snapshots().len(), 1);
    assert_consistent(&restored);
}

#[test]
fn loading_a_snapshot_replaces_the_structure_and_rewinds() {
    let mut store = short_structure();
    let id = store.save_snapshot_at("Short", 1_000).unwrap().id.clone();

    store.reset_levels();
    store.start();
    store.next_level();
    assert_ne!(store.levels().len(), 4);

    assert!(store.load_snapshot(&id));
    assert_eq!(store.levels().len(), 4);
    assert_eq!(store.current_level_index(), 0);
    assert_eq!(store.remaining_seconds(), 60);
    assert!(!store.is_running());
    assert_eq!(store.tournament_name(), "Short");

    assert!(store.delete_snapshot(&id));
    assert!(!store.load_snapshot(&id));
}

#[test]
fn structure_edits_keep_the_store_consistent() {
    let mut store = short_structure();
    store.start();
    store.next_level();
    store.next_level();
    store.next_level();

    store.delete_level(3).unwrap();
    assert_consistent(&store);
    assert_eq!(store.current_level_index(), 2);

    store.add_level();
    store.add_break();
    assert_consistent(&store);
    assert_eq!(store.levels().len(), 5);

    store.set_all_durations(10).unwrap();
    assert_consistent(&store);
    assert_eq!(store.current_level_index(), 0);
    assert_eq!(store.remaining_seconds(), 600);
    assert!(store.levels().iter().filter(|l| !l.is_break).all(|l| l.duration_minutes == 10));

    while store.levels().len() > 1 {
        store.delete_level(0).unwrap();
        assert_consistent(&store);
    }
    assert!(store.delete_level(0).is_err());
}

#[test]
fn unreadable_storage_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage
        .set(blind_clock::config::STORAGE_KEY, "{\"state\": 42}")
        .unwrap();
    assert_eq!(persistence::load(&storage), TournamentStore::default());
}
