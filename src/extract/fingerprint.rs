//! First-row signature used to notice silent page changes.

use super::rows::TableMarkers;
use super::view::{data_rows, inner_text, PageView};

/// Normalized text of the first data row. Only ever compared for equality
/// against fingerprints of the same table within one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PageFingerprint(String);

impl PageFingerprint {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fingerprint of the visible results table; empty when there are no rows.
pub fn fingerprint(view: &PageView, markers: &TableMarkers) -> PageFingerprint {
    markers
        .find(view)
        .and_then(|table| data_rows(table).next())
        .map(|row| PageFingerprint(inner_text(row)))
        .unwrap_or_default()
}
