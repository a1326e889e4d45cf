use crate::time_format::{TimeFormatError, generate_time_slots};
use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "teacher_timetable_v1";
pub const DEFAULT_START: &str = "12:00";
pub const DEFAULT_END: &str = "22:00";
pub const DEFAULT_STEP_MINUTES: u32 = 30;

pub const DEFAULT_DAYS: [&str; 7] = [
    "السبت",
    "الأحد",
    "الاثنين",
    "الثلاثاء",
    "الأربعاء",
    "الخميس",
    "الجمعة",
];

pub fn default_days() -> Vec<String> {
    DEFAULT_DAYS.iter().map(|d| d.to_string()).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Rtl,
    Ltr,
}

impl TextDirection {
    pub fn toggle(self) -> Self {
        match self {
            TextDirection::Rtl => TextDirection::Ltr,
            TextDirection::Ltr => TextDirection::Rtl,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Rtl => "rtl",
            TextDirection::Ltr => "ltr",
        }
    }
}

/// Time range, slot size and display preferences for the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    pub start: TimeSlot,
    pub end: TimeSlot,
    pub step_minutes: u32,
    pub use_12h: bool,
    pub direction: TextDirection,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            step_minutes: DEFAULT_STEP_MINUTES,
            use_12h: true,
            direction: TextDirection::Rtl,
        }
    }
}

impl TimetableConfig {
    pub fn validate(&self) -> Result<(), TimeFormatError> {
        if self.step_minutes == 0 {
            return Err(TimeFormatError::InvalidStep(self.step_minutes));
        }
        Ok(())
    }

    pub fn generated_times(&self) -> Result<Vec<TimeSlot>, TimeFormatError> {
        generate_time_slots(&self.start, &self.end, self.step_minutes)
    }
}

pub(crate) fn default_start() -> TimeSlot {
    TimeSlot::from_minutes(12 * 60).expect("12:00 is a valid slot")
}

pub(crate) fn default_end() -> TimeSlot {
    TimeSlot::from_minutes(22 * 60).expect("22:00 is a valid slot")
}

/// Where the timetable state lives: a named slot inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub key: String,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn new(key: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Reads `TIMETABLE_STORAGE_KEY` and `TIMETABLE_DATA_DIR`, falling back to
    /// the defaults for anything unset or blank.
    pub fn from_env() -> Self {
        let key = std::env::var("TIMETABLE_STORAGE_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let data_dir = std::env::var("TIMETABLE_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self { key, data_dir }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("timetable-tool"))
        .unwrap_or_else(|| PathBuf::from("."))
}
