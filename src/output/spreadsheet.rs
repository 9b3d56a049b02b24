//! Excel workbook output.

use std::io::Write;

use rust_xlsxwriter::{Format, Workbook};

use super::{OutputError, ResultWriter};
use crate::extract::SessionResult;
use crate::models::COLUMNS;

/// Worksheet holding the records.
pub const SHEET_NAME: &str = "Farmacie";

/// One worksheet: bold header row, then one row per record.
///
/// Every cell is written as text so postal codes and tax IDs keep their
/// leading zeros.
#[derive(Debug, Clone, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ResultWriter for XlsxWriter {
    fn write<W: Write>(&self, result: &SessionResult, mut out: W) -> Result<(), OutputError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        for (col, name) in COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *name, &header)?;
        }
        for (row, record) in result.records.iter().enumerate() {
            for (col, value) in record.fields().iter().enumerate() {
                sheet.write_string(row as u32 + 1, col as u16, *value)?;
            }
        }
        sheet.set_freeze_panes(1, 0)?;
        sheet.autofit();

        out.write_all(&workbook.save_to_buffer()?)?;
        Ok(())
    }
}
