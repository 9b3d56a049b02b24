//! Interpretation of page snapshots.

use super::fingerprint::{fingerprint, PageFingerprint};
use super::progress::{ProgressGrammar, ProgressState, DEFAULT_COUNTER_MARKER};
use super::rows::{extract_rows, TableMarkers};
use super::view::PageView;
use crate::error::ExtractError;
use crate::models::Record;

/// Everything needed to read rows, counter and fingerprint from a snapshot.
#[derive(Debug, Clone)]
pub struct PageReader {
    grammar: ProgressGrammar,
    counter_marker: String,
    markers: TableMarkers,
}

impl Default for PageReader {
    fn default() -> Self {
        Self::new(ProgressGrammar::default(), DEFAULT_COUNTER_MARKER, TableMarkers::default())
    }
}

impl PageReader {
    pub fn new(grammar: ProgressGrammar, counter_marker: impl Into<String>, markers: TableMarkers) -> Self {
        Self {
            grammar,
            counter_marker: counter_marker.into(),
            markers,
        }
    }

    pub fn markers(&self) -> &TableMarkers {
        &self.markers
    }

    pub fn rows(&self, view: &PageView) -> Result<Vec<Record>, ExtractError> {
        extract_rows(view, &self.markers)
    }

    pub fn progress(&self, view: &PageView) -> Result<ProgressState, ExtractError> {
        self.grammar.read(view, &self.counter_marker)
    }

    pub fn fingerprint(&self, view: &PageView) -> PageFingerprint {
        fingerprint(view, &self.markers)
    }

    /// Lenient reading used while a page may still be re-rendering: an
    /// unreadable counter is `None` instead of an error.
    pub fn read_lenient(&self, html: &str) -> (Option<ProgressState>, PageFingerprint) {
        let view = PageView::parse(html);
        (self.progress(&view).ok(), self.fingerprint(&view))
    }

    /// Whether the results table is present in `html`.
    pub fn has_table(&self, html: &str) -> bool {
        self.markers.find(&PageView::parse(html)).is_some()
    }
}
