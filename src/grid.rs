use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Day label to time slot to free-text content.
///
/// Kept dense over the active days x times product: every coordinate the
/// timetable exposes has an entry, possibly the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: BTreeMap<String, BTreeMap<TimeSlot, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    UnknownCell { day: String, time: TimeSlot },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnknownCell { day, time } => {
                write!(f, "no cell for day '{day}' at {time}")
            }
        }
    }
}

impl std::error::Error for GridError {}

impl Grid {
    pub fn empty(days: &[String], times: &[TimeSlot]) -> Self {
        let cells = days
            .iter()
            .map(|day| {
                let row = times.iter().map(|t| (t.clone(), String::new())).collect();
                (day.clone(), row)
            })
            .collect();
        Self { cells }
    }

    /// Rebuilds the grid for a new shape, carrying over content for every
    /// coordinate present in both shapes. Content outside the new shape is
    /// dropped.
    pub fn reconcile(&self, days: &[String], times: &[TimeSlot]) -> Self {
        let mut next = Self::empty(days, times);
        for (day, row) in next.cells.iter_mut() {
            for (time, content) in row.iter_mut() {
                if let Some(previous) = self.get(day, time) {
                    content.clone_from(previous);
                }
            }
        }
        next
    }

    pub fn from_rows(cells: BTreeMap<String, BTreeMap<TimeSlot, String>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, day: &str, time: &TimeSlot) -> Option<&String> {
        self.cells.get(day).and_then(|row| row.get(time))
    }

    pub fn set_cell(
        &mut self,
        day: &str,
        time: &TimeSlot,
        content: impl Into<String>,
    ) -> Result<(), GridError> {
        let cell = self
            .cells
            .get_mut(day)
            .and_then(|row| row.get_mut(time))
            .ok_or_else(|| GridError::UnknownCell {
                day: day.to_string(),
                time: time.clone(),
            })?;
        *cell = content.into();
        Ok(())
    }

    /// Empties every cell, keeping the shape.
    pub fn clear(&mut self) {
        self.cells
            .values_mut()
            .flat_map(|row| row.values_mut())
            .for_each(String::clear);
    }

    pub fn row(&self, day: &str) -> Option<&BTreeMap<TimeSlot, String>> {
        self.cells.get(day)
    }

    pub fn days(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }

    pub fn is_dense_over(&self, days: &[String], times: &[TimeSlot]) -> bool {
        self.cells.len() == days.len()
            && days.iter().all(|day| {
                self.cells.get(day).is_some_and(|row| {
                    row.len() == times.len() && times.iter().all(|t| row.contains_key(t))
                })
            })
    }

    pub fn filled_cells(&self) -> usize {
        self.cells
            .values()
            .flat_map(|row| row.values())
            .filter(|content| !content.is_empty())
            .count()
    }
}

/// Prepends a trimmed day label. Blank labels and exact duplicates are
/// ignored; returns whether the list changed.
pub fn add_day(days: &mut Vec<String>, new_day: &str) -> bool {
    let label = new_day.trim();
    if label.is_empty() || days.iter().any(|d| d == label) {
        return false;
    }
    days.insert(0, label.to_string());
    true
}

pub fn remove_day(days: &mut Vec<String>, day: &str) -> bool {
    let before = days.len();
    days.retain(|d| d != day);
    days.len() != before
}

/// Inserts a slot keeping the list sorted; duplicates are ignored.
pub fn add_time_slot(times: &mut Vec<TimeSlot>, new_time: TimeSlot) -> bool {
    if times.contains(&new_time) {
        return false;
    }
    times.push(new_time);
    times.sort();
    true
}
