use super::{ExchangeResult, TimetableDocument, export_document, export_table, import_document};
use crate::grid::Grid;
use crate::time_slot::TimeSlot;
use std::fs;
use std::path::Path;

pub fn save_document_to_json<P: AsRef<Path>>(
    days: &[String],
    times: &[TimeSlot],
    grid: &Grid,
    path: P,
) -> ExchangeResult<()> {
    let json = export_document(days, times, grid)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn save_table_to_csv<P: AsRef<Path>>(
    days: &[String],
    times: &[TimeSlot],
    grid: &Grid,
    use_12h: bool,
    path: P,
) -> ExchangeResult<()> {
    let table = export_table(days, times, grid, use_12h)?;
    fs::write(path, table)?;
    Ok(())
}

pub fn load_document_from_json<P: AsRef<Path>>(path: P) -> ExchangeResult<TimetableDocument> {
    let raw = fs::read_to_string(path)?;
    import_document(&raw)
}
