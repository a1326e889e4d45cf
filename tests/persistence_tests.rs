use tempfile::tempdir;
use timetable_tool::config::{DEFAULT_STORAGE_KEY, default_days};
use timetable_tool::{
    FileSlotStore, MemorySlotStore, PersistedState, SlotStore, StateRepository, StorageConfig,
    TimeSlot, Timetable, TimetableConfig, format_time_label,
};

fn memory_repository() -> StateRepository {
    StateRepository::new(Box::new(MemorySlotStore::new()), DEFAULT_STORAGE_KEY)
}

#[test]
fn empty_slot_loads_as_none() {
    let repo = memory_repository();
    assert!(repo.load().is_none());
    assert_eq!(repo.load_or_default(), PersistedState::default());
}

#[test]
fn malformed_slot_falls_back_to_defaults() {
    let store = MemorySlotStore::new();
    store.write("slot", "{ definitely not json").unwrap();
    let repo = StateRepository::new(Box::new(store), "slot");
    assert!(repo.load().is_none());

    let timetable = Timetable::from_state(repo.load_or_default());
    assert_eq!(timetable.days(), default_days().as_slice());
    assert_eq!(timetable.times().len(), 21);
}

#[test]
fn missing_fields_take_documented_defaults() {
    let state: PersistedState = serde_json::from_str(r#"{ "days": ["Mon"] }"#).unwrap();
    assert_eq!(state.days, vec!["Mon".to_string()]);
    assert!(state.rtl);
    assert!(state.use_12h);
    assert_eq!(state.start.as_str(), "12:00");
    assert_eq!(state.end.as_str(), "22:00");
    assert_eq!(state.step, 30);
    assert!(state.history.is_empty());
    assert!(state.times.is_none());
}

#[test]
fn stored_json_uses_the_slot_field_names() {
    let state = Timetable::new().to_state();
    let value = serde_json::to_value(&state).unwrap();
    for field in ["rtl", "days", "start", "end", "step", "grid", "use12h", "history"] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }
    assert!(value.get("use_12h").is_none());
}

#[test]
fn save_then_load_round_trips_through_memory() {
    let repo = memory_repository();
    let mut timetable = Timetable::new();
    let noon = TimeSlot::parse("12:00").unwrap();
    timetable.set_cell("السبت", &noon, "رياضيات").unwrap();
    timetable.add_time_slot("23:00").unwrap();
    timetable.new_week();
    timetable.set_cell("الأحد", &noon, "علوم").unwrap();

    repo.save(&timetable.to_state()).unwrap();
    let reloaded = Timetable::from_state(repo.load().unwrap());
    assert_eq!(reloaded, timetable);
}

#[test]
fn file_store_writes_one_file_per_key() {
    let dir = tempdir().unwrap();
    let config = StorageConfig::new("weekly_v1", dir.path().join("nested"));
    let repo = StateRepository::from_config(&config);
    repo.save(&PersistedState::default()).unwrap();

    let path = dir.path().join("nested").join("weekly_v1.json");
    assert!(path.exists());
    assert_eq!(repo.load().unwrap(), PersistedState::default());
}

#[test]
fn file_store_rejects_keys_that_escape_the_directory() {
    let dir = tempdir().unwrap();
    let store = FileSlotStore::new(dir.path());
    assert!(store.write("../outside", "{}").is_err());
    assert!(store.read("").is_err());
    assert!(store.read("missing").unwrap().is_none());
}

#[test]
fn stored_grid_is_reshaped_on_load() {
    let raw = r#"{
        "days": ["Sat"],
        "start": "09:00",
        "end": "10:00",
        "step": 60,
        "grid": { "Sat": { "09:00": "Math", "13:00": "gone" }, "Old": { "09:00": "gone" } }
    }"#;
    let state: PersistedState = serde_json::from_str(raw).unwrap();
    let timetable = Timetable::from_state(state);
    assert!(timetable.grid().is_dense_over(timetable.days(), timetable.times()));
    assert_eq!(timetable.grid().filled_cells(), 1);
}

#[test]
fn zero_step_in_storage_uses_default_step() {
    let state: PersistedState = serde_json::from_str(r#"{ "step": 0 }"#).unwrap();
    let timetable = Timetable::from_state(state);
    assert_eq!(timetable.config().step_minutes, 30);
    assert_eq!(timetable.times().len(), 21);
}

#[test]
fn late_range_config_survives_save_and_reload() {
    let repo = memory_repository();
    let mut timetable = Timetable::new();
    let noon = TimeSlot::parse("12:00").unwrap();
    timetable.set_cell("السبت", &noon, "رياضيات").unwrap();
    timetable.new_week();

    let config = TimetableConfig {
        start: TimeSlot::parse("99:00").unwrap(),
        end: TimeSlot::parse("99:99").unwrap(),
        step_minutes: 30,
        ..timetable.config().clone()
    };
    timetable.set_config(config).unwrap();
    let tokens: Vec<&str> = timetable.times().iter().map(TimeSlot::as_str).collect();
    assert_eq!(tokens, ["99:00", "99:30"]);
    for time in timetable.times() {
        assert!(!format_time_label(time, true).is_empty());
    }

    repo.save(&timetable.to_state()).unwrap();
    let reloaded = Timetable::from_state(repo.load().expect("state reloads"));
    assert_eq!(reloaded.archive().len(), 1);
    assert_eq!(reloaded, timetable);
}

#[test]
fn stored_blank_and_repeated_days_are_dropped() {
    let raw = r#"{ "days": ["Sat", "Sat", " ", "Sun"], "grid": { "Sat": {} } }"#;
    let state: PersistedState = serde_json::from_str(raw).unwrap();
    let timetable = Timetable::from_state(state);
    assert_eq!(timetable.days(), ["Sat".to_string(), "Sun".to_string()].as_slice());
    assert!(timetable.grid().is_dense_over(timetable.days(), timetable.times()));
    assert_eq!(timetable.grid().days().count(), 2);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use timetable_tool::SqliteSlotStore;

    #[test]
    fn sqlite_store_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let store = SqliteSlotStore::new(dir.path().join("timetable.db")).unwrap();
        store.write("k", "first").unwrap();
        store.write("k", "second").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("second"));
        assert!(store.read("other").unwrap().is_none());
    }

    #[test]
    fn sqlite_repository_round_trips_state() {
        let store = SqliteSlotStore::in_memory().unwrap();
        let repo = StateRepository::new(Box::new(store), DEFAULT_STORAGE_KEY);
        let mut timetable = Timetable::new();
        timetable.add_day("Evening");
        repo.save(&timetable.to_state()).unwrap();
        let loaded = Timetable::from_state(repo.load().unwrap());
        assert_eq!(loaded.days()[0], "Evening");
        assert_eq!(loaded, timetable);
    }
}
