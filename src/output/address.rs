//! Single-line postal addresses for geocoding and map imports.

use std::io::{Read, Write};

use super::OutputError;
use crate::models::Record;

/// Column appended by [`append_full_address`].
pub const FULL_ADDRESS_COLUMN: &str = "Full Address";

const POSTAL_CODE_WIDTH: usize = 5;

/// `"<address>, <postal code>, <municipality>, <country>"`, skipping empty
/// parts. Numeric postal codes are zero-padded to five digits, restoring
/// leading zeros lost by spreadsheet round trips.
pub fn full_address(record: &Record, country: &str) -> String {
    format_address(record.address(), record.postal_code(), record.municipality(), country)
}

fn format_address(address: &str, postal_code: &str, municipality: &str, country: &str) -> String {
    let postal_code = pad_postal_code(postal_code.trim());
    [address.trim(), postal_code.as_str(), municipality.trim(), country.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn pad_postal_code(code: &str) -> String {
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>width$}", code, width = POSTAL_CODE_WIDTH)
    } else {
        code.to_string()
    }
}

/// Copy a CSV written by [`CsvWriter`](super::CsvWriter), adding a
/// [`FULL_ADDRESS_COLUMN`] to every row. Returns the number of rows written.
pub fn append_full_address<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    country: &str,
    bom: bool,
) -> Result<usize, OutputError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| OutputError::MissingColumn(name.to_string()))
    };
    let address = column("Address")?;
    let postal_code = column("Postal Code")?;
    let municipality = column("Municipality")?;

    if bom {
        output.write_all("\u{feff}".as_bytes())?;
    }
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(headers.iter().chain([FULL_ADDRESS_COLUMN]))?;

    let mut rows = 0;
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or("");
        let formatted = format_address(field(address), field(postal_code), field(municipality), country);
        writer.write_record(row.iter().chain([formatted.as_str()]))?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}
