//! Integration tests for snapshot persistence across store instances.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use tinywins_core::storage::{STORAGE_KEY, SCHEMA_VERSION};
use tinywins_core::{
    find_identity, HabitStore, JsonFileStorage, ManualClock, MemoryStorage, NewHabit,
    RecoveryState, SqliteStorage, StateStorage, WhimsyLevel,
};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 9, 14, 18, 0, 0).unwrap())
}

fn populate(store: &mut HabitStore) -> String {
    store.select_identity(find_identity("writer").unwrap());
    let habit = store.create_habit(NewHabit::new("writer", "Write one sentence"));
    store.mark_habit_complete(&habit.id);
    store.set_whimsy_level(WhimsyLevel::Maximum);
    store.pause_progress(14);
    habit.id
}

#[test]
fn test_memory_round_trip_restores_everything_but_celebrations() {
    let storage = MemoryStorage::new();
    let mut store = HabitStore::builder(storage.clone()).clock(clock()).open();
    let habit_id = populate(&mut store);
    assert_eq!(store.celebration_queue().len(), 1);

    let reopened = HabitStore::builder(storage).clock(clock()).open();
    assert_eq!(reopened.selected_identity().map(|i| i.id.as_str()), Some("writer"));
    assert_eq!(reopened.habits(), store.habits());
    assert_eq!(reopened.check_ins(), store.check_ins());
    assert_eq!(reopened.progress(), store.progress());
    assert_eq!(reopened.whimsy_level(), WhimsyLevel::Maximum);
    assert_eq!(reopened.progress().recovery_state, RecoveryState::Paused);
    assert_eq!(reopened.habit_streak(&habit_id), 1);
    assert!(reopened.celebration_queue().is_empty());
}

#[test]
fn test_sqlite_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tinywins.db");

    let habit_id = {
        let mut store = HabitStore::builder(SqliteStorage::open_at(&path).unwrap())
            .clock(clock())
            .open();
        populate(&mut store)
    };

    let reopened = HabitStore::builder(SqliteStorage::open_at(&path).unwrap())
        .clock(clock())
        .open();
    assert_eq!(reopened.habits().len(), 1);
    assert_eq!(reopened.habits()[0].id, habit_id);
    assert_eq!(reopened.identity_streak("writer"), 1);
    assert_eq!(reopened.days_until_recovery(), 14);
}

#[test]
fn test_json_file_round_trip() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = HabitStore::builder(JsonFileStorage::new(dir.path().to_path_buf()))
            .clock(clock())
            .open();
        populate(&mut store);
    }

    let raw = std::fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], SCHEMA_VERSION);
    assert_eq!(json["state"]["userProgress"]["totalShowUps"], 1);
    assert_eq!(json["state"]["whimsyLevel"], "maximum");

    let reopened = HabitStore::builder(JsonFileStorage::new(dir.path().to_path_buf()))
        .clock(clock())
        .open();
    assert_eq!(reopened.progress().total_show_ups, 1);
}

#[test]
fn test_version_mismatch_loads_defaults() {
    let storage = MemoryStorage::new();
    {
        let mut store = HabitStore::builder(storage.clone()).clock(clock()).open();
        populate(&mut store);
    }
    let raw = storage.read(STORAGE_KEY).unwrap().unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["version"] = serde_json::json!(SCHEMA_VERSION + 1);
    storage.write(STORAGE_KEY, &json.to_string()).unwrap();

    let reopened = HabitStore::builder(storage).clock(clock()).open();
    assert!(reopened.habits().is_empty());
    assert!(reopened.selected_identity().is_none());
    assert_eq!(reopened.progress().total_show_ups, 0);
    assert_eq!(reopened.whimsy_level(), WhimsyLevel::Normal);
}

#[test]
fn test_corrupt_snapshot_loads_defaults() {
    let storage = MemoryStorage::new();
    storage.write(STORAGE_KEY, "{ definitely not json").unwrap();
    let store = HabitStore::builder(storage).clock(clock()).open();
    assert!(store.habits().is_empty());
}

#[test]
fn test_every_change_is_written_back() {
    let storage = MemoryStorage::new();
    let mut store = HabitStore::builder(storage.clone()).clock(clock()).open();
    assert!(storage.read(STORAGE_KEY).unwrap().is_none());

    store.select_identity(find_identity("cook").unwrap());
    let after_select = storage.read(STORAGE_KEY).unwrap().unwrap();
    assert!(after_select.contains("\"cook\""));

    store.create_habit(NewHabit::new("cook", "Boil water"));
    let after_create = storage.read(STORAGE_KEY).unwrap().unwrap();
    assert!(after_create.contains("Boil water"));

    store.persist().unwrap();
}
