use crate::grid::Grid;
use crate::time_format::format_time_label;
use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;

pub mod file;

pub use file::{load_document_from_json, save_document_to_json, save_table_to_csv};

/// Shown to the user when an uploaded document cannot be used.
pub const INVALID_FILE_MESSAGE: &str = "ملف غير صالح";

/// First header cell of the tabular export.
pub const DAY_HEADER: &str = "اليوم";

#[derive(Debug)]
pub enum ExchangeError {
    Serialization(SerdeJsonError),
    Csv(csv::Error),
    Io(io::Error),
    InvalidDocument(String),
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Serialization(err) => write!(f, "serialization error: {err}"),
            ExchangeError::Csv(err) => write!(f, "csv error: {err}"),
            ExchangeError::Io(err) => write!(f, "io error: {err}"),
            ExchangeError::InvalidDocument(msg) => write!(f, "invalid document: {msg}"),
        }
    }
}

impl std::error::Error for ExchangeError {}

impl From<SerdeJsonError> for ExchangeError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<csv::Error> for ExchangeError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<io::Error> for ExchangeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Portable form of a timetable: `{ "days": [...], "times": [...], "grid": {...} }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableDocument {
    pub days: Vec<String>,
    pub times: Vec<TimeSlot>,
    pub grid: Grid,
}

impl TimetableDocument {
    pub fn new(days: &[String], times: &[TimeSlot], grid: &Grid) -> Self {
        Self {
            days: days.to_vec(),
            times: times.to_vec(),
            grid: grid.clone(),
        }
    }
}

// Fields stay loose here so a missing key and a malformed value can be
// reported separately.
#[derive(Deserialize)]
struct RawDocument {
    days: Option<Vec<String>>,
    times: Option<Vec<String>>,
    grid: Option<BTreeMap<String, BTreeMap<String, String>>>,
}

pub fn export_document(days: &[String], times: &[TimeSlot], grid: &Grid) -> ExchangeResult<String> {
    let document = TimetableDocument::new(days, times, grid);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// CSV with every field quoted: a header of formatted time labels, then one
/// row per day. Newlines inside a cell become spaces.
pub fn export_table(
    days: &[String],
    times: &[TimeSlot],
    grid: &Grid,
    use_12h: bool,
) -> ExchangeResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(times.len() + 1);
    header.push(DAY_HEADER.to_string());
    header.extend(times.iter().map(|t| format_time_label(t, use_12h)));
    writer.write_record(&header)?;

    for day in days {
        let mut record = Vec::with_capacity(times.len() + 1);
        record.push(day.clone());
        record.extend(times.iter().map(|t| {
            grid.get(day, t)
                .map(|content| content.replace('\n', " "))
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExchangeError::Io(err.into_error()))?;
    let mut table = String::from_utf8(bytes)
        .map_err(|err| ExchangeError::InvalidDocument(err.to_string()))?;
    if table.ends_with('\n') {
        table.pop();
    }
    Ok(table)
}

/// Parses an exported document. All of `days`, `times` and `grid` must be
/// present; the grid is then reshaped to the document's own days x times.
pub fn import_document(raw: &str) -> ExchangeResult<TimetableDocument> {
    let parsed: RawDocument = serde_json::from_str(raw)?;
    let (Some(days), Some(raw_times), Some(raw_grid)) = (parsed.days, parsed.times, parsed.grid)
    else {
        return Err(ExchangeError::InvalidDocument(
            "document must contain days, times and grid".into(),
        ));
    };

    let mut seen_days = HashSet::with_capacity(days.len());
    for day in &days {
        if day.trim().is_empty() {
            return Err(ExchangeError::InvalidDocument("blank day label".into()));
        }
        if !seen_days.insert(day.as_str()) {
            return Err(ExchangeError::InvalidDocument(format!("duplicate day '{day}'")));
        }
    }

    let mut times = Vec::with_capacity(raw_times.len());
    for token in &raw_times {
        let slot = TimeSlot::parse(token)
            .map_err(|err| ExchangeError::InvalidDocument(err.to_string()))?;
        if times.contains(&slot) {
            return Err(ExchangeError::InvalidDocument(format!(
                "duplicate time '{slot}'"
            )));
        }
        times.push(slot);
    }

    // Keys that are not valid slots can never be part of the reshaped grid.
    let rows: BTreeMap<String, BTreeMap<TimeSlot, String>> = raw_grid
        .into_iter()
        .map(|(day, row)| {
            let row: BTreeMap<TimeSlot, String> = row
                .into_iter()
                .filter_map(|(time, content)| TimeSlot::parse(&time).ok().map(|t| (t, content)))
                .collect();
            (day, row)
        })
        .collect();
    let grid = Grid::from_rows(rows).reconcile(&days, &times);

    Ok(TimetableDocument { days, times, grid })
}
