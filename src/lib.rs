pub mod archive;
pub mod config;
pub mod exchange;
pub mod grid;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod time_format;
pub mod time_slot;
pub mod timetable;

pub use archive::{Archive, ArchiveEntry, ArchiveError};
pub use config::{StorageConfig, TextDirection, TimetableConfig};
pub use exchange::{
    ExchangeError, TimetableDocument, export_document, export_table, import_document,
    load_document_from_json, save_document_to_json, save_table_to_csv,
};
pub use grid::{Grid, GridError, add_day, add_time_slot, remove_day};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteSlotStore;
pub use persistence::{
    FileSlotStore, MemorySlotStore, PersistedState, PersistenceError, SlotStore, StateRepository,
};
pub use time_format::{TimeFormatError, format_display_label, format_time_label, generate_time_slots};
pub use time_slot::{TimeSlot, TimeSlotError};
pub use timetable::{Timetable, TimetableError, TimetableResult};
