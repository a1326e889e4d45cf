use crate::archive::{Archive, ArchiveEntry, ArchiveError};
use crate::config::{TextDirection, TimetableConfig, default_days};
use crate::exchange::{self, ExchangeError, TimetableDocument};
use crate::grid::{self, Grid, GridError};
use crate::persistence::PersistedState;
use crate::time_format::TimeFormatError;
use crate::time_slot::{TimeSlot, TimeSlotError};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug)]
pub enum TimetableError {
    TimeFormat(TimeFormatError),
    TimeSlot(TimeSlotError),
    Grid(GridError),
    Archive(ArchiveError),
    Exchange(ExchangeError),
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::TimeFormat(err) => write!(f, "{err}"),
            TimetableError::TimeSlot(err) => write!(f, "{err}"),
            TimetableError::Grid(err) => write!(f, "{err}"),
            TimetableError::Archive(err) => write!(f, "{err}"),
            TimetableError::Exchange(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TimetableError {}

impl From<TimeFormatError> for TimetableError {
    fn from(value: TimeFormatError) -> Self {
        Self::TimeFormat(value)
    }
}

impl From<TimeSlotError> for TimetableError {
    fn from(value: TimeSlotError) -> Self {
        Self::TimeSlot(value)
    }
}

impl From<GridError> for TimetableError {
    fn from(value: GridError) -> Self {
        Self::Grid(value)
    }
}

impl From<ArchiveError> for TimetableError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}

impl From<ExchangeError> for TimetableError {
    fn from(value: ExchangeError) -> Self {
        Self::Exchange(value)
    }
}

pub type TimetableResult<T> = Result<T, TimetableError>;

/// The weekly timetable: configuration, day rows, time columns, cell content
/// and the archive of past weeks.
///
/// Every structural change (days, times, configuration) reshapes the grid
/// before returning, so a cell edit never lands in a stale shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    config: TimetableConfig,
    days: Vec<String>,
    times: Vec<TimeSlot>,
    custom_times: Vec<TimeSlot>,
    grid: Grid,
    archive: Archive,
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new()
    }
}

impl Timetable {
    pub fn new() -> Self {
        let config = TimetableConfig::default();
        let days = default_days();
        let times = config.generated_times().unwrap_or_default();
        let grid = Grid::empty(&days, &times);
        Self {
            config,
            days,
            times,
            custom_times: Vec::new(),
            grid,
            archive: Archive::new(),
        }
    }

    pub fn from_state(state: PersistedState) -> Self {
        let mut config = TimetableConfig {
            start: state.start,
            end: state.end,
            step_minutes: state.step,
            use_12h: state.use_12h,
            direction: if state.rtl {
                TextDirection::Rtl
            } else {
                TextDirection::Ltr
            },
        };
        if let Err(err) = config.validate() {
            warn!(error = %err, "stored step is invalid; falling back to the default step");
            config.step_minutes = TimetableConfig::default().step_minutes;
        }

        let mut custom_times = state.custom_times;
        custom_times.sort();
        custom_times.dedup();
        let times = match state.times {
            Some(mut times) => {
                times.sort();
                times.dedup();
                times
            }
            None => merge_times(config.generated_times().unwrap_or_default(), &custom_times),
        };
        let days = clean_days(state.days);
        let grid = state.grid.reconcile(&days, &times);

        Self {
            config,
            days,
            times,
            custom_times,
            grid,
            archive: state.history,
        }
    }

    pub fn to_state(&self) -> PersistedState {
        PersistedState {
            rtl: self.config.direction.is_rtl(),
            days: self.days.clone(),
            start: self.config.start.clone(),
            end: self.config.end.clone(),
            step: self.config.step_minutes,
            times: Some(self.times.clone()),
            custom_times: self.custom_times.clone(),
            grid: self.grid.clone(),
            use_12h: self.config.use_12h,
            history: self.archive.clone(),
        }
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn times(&self) -> &[TimeSlot] {
        &self.times
    }

    pub fn custom_times(&self) -> &[TimeSlot] {
        &self.custom_times
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Replaces the configuration and rebuilds the time columns from it plus
    /// any individually added slots.
    pub fn set_config(&mut self, config: TimetableConfig) -> TimetableResult<()> {
        config.validate()?;
        let generated = config.generated_times()?;
        self.config = config;
        self.times = merge_times(generated, &self.custom_times);
        self.reshape();
        Ok(())
    }

    pub fn set_use_12h(&mut self, use_12h: bool) {
        self.config.use_12h = use_12h;
    }

    pub fn toggle_direction(&mut self) -> TextDirection {
        self.config.direction = self.config.direction.toggle();
        self.config.direction
    }

    pub fn add_day(&mut self, day: &str) -> bool {
        let changed = grid::add_day(&mut self.days, day);
        if changed {
            self.reshape();
        }
        changed
    }

    pub fn remove_day(&mut self, day: &str) -> bool {
        let changed = grid::remove_day(&mut self.days, day);
        if changed {
            self.reshape();
        }
        changed
    }

    /// Adds a custom `HH:MM` column. Malformed input is rejected without
    /// touching the timetable; an existing slot is a no-op.
    pub fn add_time_slot(&mut self, input: &str) -> TimetableResult<bool> {
        let slot = TimeSlot::parse(input.trim())?;
        if !grid::add_time_slot(&mut self.times, slot.clone()) {
            return Ok(false);
        }
        if !self.custom_times.contains(&slot) {
            self.custom_times.push(slot);
            self.custom_times.sort();
        }
        self.reshape();
        Ok(true)
    }

    pub fn set_cell(
        &mut self,
        day: &str,
        time: &TimeSlot,
        content: impl Into<String>,
    ) -> TimetableResult<()> {
        self.grid.set_cell(day, time, content)?;
        Ok(())
    }

    pub fn snapshot(&mut self) -> &ArchiveEntry {
        self.archive.snapshot(&self.days, &self.times, &self.grid)
    }

    /// Archives the current week, then empties every cell keeping the shape.
    pub fn new_week(&mut self) -> &ArchiveEntry {
        self.archive
            .push(ArchiveEntry::capture(&self.days, &self.times, &self.grid));
        self.grid.clear();
        info!(archived = self.archive.len(), "started a new week");
        &self.archive.entries()[0]
    }

    /// Makes an archived week the active timetable: days, times and content.
    pub fn restore_archive(&mut self, index: usize) -> TimetableResult<()> {
        let (days, times, grid) = self.archive.get(index)?.restore();
        self.apply_shape(days, times, &grid)?;
        info!(index, "restored archived week");
        Ok(())
    }

    pub fn delete_archive(&mut self, index: usize) -> TimetableResult<ArchiveEntry> {
        Ok(self.archive.delete(index)?)
    }

    pub fn document(&self) -> TimetableDocument {
        TimetableDocument::new(&self.days, &self.times, &self.grid)
    }

    pub fn export_document(&self) -> TimetableResult<String> {
        Ok(exchange::export_document(&self.days, &self.times, &self.grid)?)
    }

    pub fn export_table(&self) -> TimetableResult<String> {
        Ok(exchange::export_table(
            &self.days,
            &self.times,
            &self.grid,
            self.config.use_12h,
        )?)
    }

    /// Replaces days, times and content from an exported document. On any
    /// error the timetable is left untouched.
    ///
    /// Times are stored in chronological order, so a document listing them
    /// out of order is not reproduced verbatim by a later export. Cell
    /// content follows its slot regardless of position.
    pub fn import_document(&mut self, raw: &str) -> TimetableResult<()> {
        let document = exchange::import_document(raw)?;
        self.apply_document(document)
    }

    pub fn apply_document(&mut self, document: TimetableDocument) -> TimetableResult<()> {
        let TimetableDocument { days, times, grid } = document;
        self.apply_shape(days, times, &grid)?;
        info!(
            days = self.days.len(),
            times = self.times.len(),
            "imported timetable document"
        );
        Ok(())
    }

    fn apply_shape(
        &mut self,
        days: Vec<String>,
        mut times: Vec<TimeSlot>,
        grid: &Grid,
    ) -> TimetableResult<()> {
        let generated = self.config.generated_times()?;
        times.sort();
        times.dedup();
        self.custom_times = times
            .iter()
            .filter(|t| !generated.contains(t))
            .cloned()
            .collect();
        self.grid = grid.reconcile(&days, &times);
        self.days = days;
        self.times = times;
        Ok(())
    }

    fn reshape(&mut self) {
        self.grid = self.grid.reconcile(&self.days, &self.times);
    }
}

// Stored day lists come from outside; blank and repeated labels would break
// the one-row-per-day grid.
fn clean_days(stored: Vec<String>) -> Vec<String> {
    let total = stored.len();
    let mut days: Vec<String> = Vec::with_capacity(total);
    for day in stored {
        if !day.trim().is_empty() && !days.contains(&day) {
            days.push(day);
        }
    }
    if days.len() != total {
        warn!(
            dropped = total - days.len(),
            "stored days contained blank or duplicate labels"
        );
    }
    days
}

fn merge_times(mut generated: Vec<TimeSlot>, custom: &[TimeSlot]) -> Vec<TimeSlot> {
    generated.extend(custom.iter().cloned());
    generated.sort();
    generated.dedup();
    generated
}
