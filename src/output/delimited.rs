//! CSV output.

use std::io::Write;

use super::{OutputError, ResultWriter};
use crate::extract::SessionResult;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus one line per record, columns in persisted order.
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    bom: bool,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix output with a UTF-8 byte order mark so spreadsheet tools
    /// detect the encoding.
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

impl ResultWriter for CsvWriter {
    fn write<W: Write>(&self, result: &SessionResult, mut out: W) -> Result<(), OutputError> {
        if self.bom {
            out.write_all(UTF8_BOM)?;
        }
        let mut writer = csv::Writer::from_writer(out);
        for record in &result.records {
            writer.serialize(record)?;
        }
        if result.records.is_empty() {
            writer.write_record(crate::models::COLUMNS)?;
        }
        writer.flush()?;
        Ok(())
    }
}
