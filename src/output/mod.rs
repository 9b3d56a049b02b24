//! Serialization of session results.
//!
//! Writers receive records already unique and in first-seen order; they
//! never sort or deduplicate.

mod address;
mod delimited;
mod json;
mod spreadsheet;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::extract::SessionResult;

pub use address::{append_full_address, full_address, FULL_ADDRESS_COLUMN};
pub use delimited::CsvWriter;
pub use json::JsonWriter;
pub use spreadsheet::{XlsxWriter, SHEET_NAME};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Missing column {0:?}")]
    MissingColumn(String),
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// JSON document with status and records
    Json,
    /// Excel workbook with a header row
    Xlsx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

/// Serializes a [`SessionResult`].
pub trait ResultWriter {
    fn write<W: Write>(&self, result: &SessionResult, out: W) -> Result<(), OutputError>;

    /// Write to a file, creating parent directories.
    fn write_file(&self, result: &SessionResult, path: &Path) -> Result<(), OutputError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        self.write(result, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// Write `result` to `path` in `format`.
pub fn write_result(
    result: &SessionResult,
    path: &Path,
    format: OutputFormat,
    bom: bool,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Csv => CsvWriter::new().with_bom(bom).write_file(result, path),
        OutputFormat::Json => JsonWriter::new().write_file(result, path),
        OutputFormat::Xlsx => XlsxWriter::new().write_file(result, path),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::extract::{SessionResult, SessionStatus, StopReason, StuckReason};
    use crate::models::Record;

    pub fn result(status: SessionStatus) -> SessionResult {
        SessionResult {
            records: vec![
                Record::from_cells([
                    "FARMACIA CENTRALE",
                    "VIA ROMA 1",
                    "20121",
                    "MILANO",
                    "MI",
                    "LOMBARDIA",
                    "0001",
                    "01234567890",
                ]),
                Record::from_cells(["FARMACIA, \"NORD\"", "VIA PO 2", "2013", "MILANO"]),
            ],
            status,
            pages: 1,
            last_progress: None,
        }
    }

    pub fn stuck() -> SessionStatus {
        SessionStatus::StuckPartial(StopReason::Advance(StuckReason::RetriesExhausted { attempts: 7 }))
    }
}
