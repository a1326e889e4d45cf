use chrono::{TimeZone, Utc};
use timetable_tool::{Archive, ArchiveEntry, ArchiveError, Grid, TimeSlot};

fn sample() -> (Vec<String>, Vec<TimeSlot>, Grid) {
    let days = vec!["Sat".to_string(), "Sun".to_string()];
    let times = vec![
        TimeSlot::parse("12:00").unwrap(),
        TimeSlot::parse("12:30").unwrap(),
    ];
    let mut grid = Grid::empty(&days, &times);
    grid.set_cell("Sat", &times[0], "Math").unwrap();
    grid.set_cell("Sun", &times[1], "Science\nlab").unwrap();
    (days, times, grid)
}

#[test]
fn snapshot_survives_clearing_the_live_grid() {
    let (days, times, mut grid) = sample();
    let mut archive = Archive::new();
    archive.snapshot(&days, &times, &grid);

    grid.clear();
    assert_eq!(grid.filled_cells(), 0);

    let (restored_days, restored_times, restored_grid) = archive.get(0).unwrap().restore();
    assert_eq!(restored_days, days);
    assert_eq!(restored_times, times);
    assert_eq!(restored_grid.get("Sat", &times[0]).unwrap(), "Math");
    assert_eq!(restored_grid.get("Sun", &times[1]).unwrap(), "Science\nlab");
}

#[test]
fn newest_entry_comes_first() {
    let (days, times, grid) = sample();
    let mut archive = Archive::new();
    let older = Utc.with_ymd_and_hms(2025, 1, 4, 8, 0, 0).unwrap();
    let newer = Utc.with_ymd_and_hms(2025, 1, 11, 8, 0, 0).unwrap();
    archive.push(ArchiveEntry::capture_at(older, &days, &times, &grid));
    archive.push(ArchiveEntry::capture_at(newer, &days, &times, &Grid::empty(&days, &times)));

    assert_eq!(archive.len(), 2);
    assert_eq!(archive.entries()[0].timestamp, newer);
    assert_eq!(archive.entries()[1].timestamp, older);
}

#[test]
fn delete_removes_only_the_chosen_entry() {
    let (days, times, grid) = sample();
    let mut archive = Archive::new();
    for day in 1..=3 {
        let at = Utc.with_ymd_and_hms(2025, 2, day, 9, 0, 0).unwrap();
        archive.push(ArchiveEntry::capture_at(at, &days, &times, &grid));
    }

    let removed = archive.delete(1).unwrap();
    assert_eq!(removed.timestamp, Utc.with_ymd_and_hms(2025, 2, 2, 9, 0, 0).unwrap());
    let remaining: Vec<u32> = archive
        .entries()
        .iter()
        .map(|e| chrono::Datelike::day(&e.timestamp))
        .collect();
    assert_eq!(remaining, vec![3, 1]);
}

#[test]
fn out_of_range_index_is_reported() {
    let mut archive = Archive::new();
    assert_eq!(
        archive.delete(0).unwrap_err(),
        ArchiveError::IndexOutOfRange { index: 0, len: 0 }
    );
    assert!(archive.get(5).is_err());
}

#[test]
fn entries_serialize_with_millisecond_timestamps() {
    let (days, times, grid) = sample();
    let at = Utc.timestamp_millis_opt(1_735_977_600_123).unwrap();
    let entry = ArchiveEntry::capture_at(at, &days, &times, &grid);

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["timestamp"], serde_json::json!(1_735_977_600_123_i64));
    assert_eq!(value["times"], serde_json::json!(["12:00", "12:30"]));

    let back: ArchiveEntry = serde_json::from_value(value).unwrap();
    assert_eq!(back, entry);
}
