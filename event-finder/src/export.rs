//! CSV export of collected events.

use std::path::{Path, PathBuf};

use crate::domain::{EventRecord, Postcode};

/// Errors from building or writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Nothing to export. Callers report this as "no events found".
    #[error("no events found")]
    EmptyResult,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished CSV export.
#[derive(Debug, Clone)]
pub struct CsvExport {
    filename: String,
    content: String,
    records: Vec<EventRecord>,
}

impl CsvExport {
    /// `<POSTCODE>.csv`
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The CSV text, header row first.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The exported records, in row order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Write the CSV into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Serialize records to CSV, one row per record.
///
/// The header row is the record field names. An empty record set is
/// [`ExportError::EmptyResult`] rather than a header-only file.
pub fn export_csv(postcode: &Postcode, records: Vec<EventRecord>) -> Result<CsvExport, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;

    Ok(CsvExport {
        filename: postcode.csv_filename(),
        content: String::from_utf8(bytes)?,
        records,
    })
}
