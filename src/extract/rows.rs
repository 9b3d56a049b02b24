//! Row extraction from the visible results table.

use serde::{Deserialize, Serialize};

use super::view::{cells, data_rows, inner_text, PageView};
use crate::error::ExtractError;
use crate::models::Record;

/// Header texts that identify the results table among the page's tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMarkers {
    #[serde(default = "default_denomination")]
    pub denomination: String,
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_denomination() -> String {
    "Denominazione".to_string()
}

fn default_address() -> String {
    "Indirizzo".to_string()
}

impl Default for TableMarkers {
    fn default() -> Self {
        Self {
            denomination: default_denomination(),
            address: default_address(),
        }
    }
}

impl TableMarkers {
    fn as_slice(&self) -> [&str; 2] {
        [&self.denomination, &self.address]
    }

    /// Locate the results table in a page snapshot.
    pub fn find<'a>(&self, view: &'a PageView) -> Option<scraper::ElementRef<'a>> {
        view.table_containing(&self.as_slice())
    }
}

/// Read every data row of the results table currently displayed.
pub fn extract_rows(view: &PageView, markers: &TableMarkers) -> Result<Vec<Record>, ExtractError> {
    let table = markers.find(view).ok_or(ExtractError::TableNotFound)?;

    Ok(data_rows(table)
        .map(|row| Record::from_cells(cells(row).map(inner_text)))
        .collect())
}
