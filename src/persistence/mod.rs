use crate::archive::Archive;
use crate::config::{self, StorageConfig};
use crate::grid::Grid;
use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A durable string-keyed slot holding one serialized value per key.
pub trait SlotStore: Send + Sync {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> PersistenceResult<()>;
}

/// Everything the timetable keeps between runs.
///
/// Field names match the stored JSON. Every field has a default so a partial
/// payload still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default = "default_rtl")]
    pub rtl: bool,
    #[serde(default = "config::default_days")]
    pub days: Vec<String>,
    #[serde(default = "config::default_start")]
    pub start: TimeSlot,
    #[serde(default = "config::default_end")]
    pub end: TimeSlot,
    #[serde(default = "default_step")]
    pub step: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<TimeSlot>>,
    #[serde(rename = "customTimes", default, skip_serializing_if = "Vec::is_empty")]
    pub custom_times: Vec<TimeSlot>,
    #[serde(default)]
    pub grid: Grid,
    #[serde(rename = "use12h", default = "default_use_12h")]
    pub use_12h: bool,
    #[serde(default)]
    pub history: Archive,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            rtl: default_rtl(),
            days: config::default_days(),
            start: config::default_start(),
            end: config::default_end(),
            step: default_step(),
            times: None,
            custom_times: Vec::new(),
            grid: Grid::default(),
            use_12h: default_use_12h(),
            history: Archive::default(),
        }
    }
}

fn default_rtl() -> bool {
    true
}

fn default_step() -> u32 {
    config::DEFAULT_STEP_MINUTES
}

fn default_use_12h() -> bool {
    true
}

/// Loads and saves [`PersistedState`] through a [`SlotStore`] under a
/// configured key.
pub struct StateRepository {
    store: Box<dyn SlotStore>,
    key: String,
}

impl StateRepository {
    pub fn new(store: Box<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// File-backed repository under the configured data directory.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(Box::new(FileSlotStore::new(&config.data_dir)), &config.key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, state: &PersistedState) -> PersistenceResult<()> {
        let json = serde_json::to_string(state)?;
        self.store.write(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "timetable state saved");
        Ok(())
    }

    /// Returns `None` when the slot is empty or unreadable. Read and parse
    /// failures are logged and otherwise swallowed.
    pub fn load(&self) -> Option<PersistedState> {
        let raw = match self.store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read timetable state");
                return None;
            }
        };
        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => {
                debug!(key = %self.key, "timetable state loaded");
                Some(state)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored timetable state is malformed; using defaults");
                None
            }
        }
    }

    pub fn load_or_default(&self) -> PersistedState {
        self.load().unwrap_or_default()
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSlotStore;
