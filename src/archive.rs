use crate::grid::Grid;
use crate::time_slot::TimeSlot;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A frozen copy of a past week. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub days: Vec<String>,
    pub times: Vec<TimeSlot>,
    pub grid: Grid,
}

impl ArchiveEntry {
    /// Stamps the copy with the current instant, truncated to the millisecond
    /// precision the timestamp is stored with.
    pub fn capture(days: &[String], times: &[TimeSlot], grid: &Grid) -> Self {
        let now = Utc::now();
        let now = now
            .with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
            .unwrap_or(now);
        Self::capture_at(now, days, times, grid)
    }

    pub fn capture_at(
        timestamp: DateTime<Utc>,
        days: &[String],
        times: &[TimeSlot],
        grid: &Grid,
    ) -> Self {
        Self {
            timestamp,
            days: days.to_vec(),
            times: times.to_vec(),
            grid: grid.clone(),
        }
    }

    /// Owned copies of the stored shape and content, ready to become the
    /// active timetable.
    pub fn restore(&self) -> (Vec<String>, Vec<TimeSlot>, Grid) {
        (self.days.clone(), self.times.clone(), self.grid.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::IndexOutOfRange { index, len } => {
                write!(f, "archive entry {index} does not exist ({len} stored)")
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

/// Past weeks, newest first. Grows without eviction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&mut self, days: &[String], times: &[TimeSlot], grid: &Grid) -> &ArchiveEntry {
        self.push(ArchiveEntry::capture(days, times, grid))
    }

    pub fn push(&mut self, entry: ArchiveEntry) -> &ArchiveEntry {
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn get(&self, index: usize) -> Result<&ArchiveEntry, ArchiveError> {
        self.entries.get(index).ok_or(ArchiveError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn delete(&mut self, index: usize) -> Result<ArchiveEntry, ArchiveError> {
        if index >= self.entries.len() {
            return Err(ArchiveError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
