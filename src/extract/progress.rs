//! Results counter parsing ("risultati 1 - 10 di 426").

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use super::view::PageView;
use crate::error::ExtractError;

/// Connector word used by the directory's locale.
pub const DEFAULT_CONNECTOR: &str = "di";

/// Word that labels the counter element.
pub const DEFAULT_COUNTER_MARKER: &str = "risultati";

/// Range end and total parsed from one counter reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub end: u64,
    pub total: u64,
}

impl ProgressState {
    /// Whether the displayed range reaches the last record.
    pub fn is_complete(&self) -> bool {
        self.end >= self.total
    }
}

impl std::fmt::Display for ProgressState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.end, self.total)
    }
}

/// Counter grammar with a fixed connector token.
#[derive(Debug, Clone)]
pub struct ProgressGrammar {
    connector: String,
    /// `<start> - <end> <connector> <total>`, case-insensitive.
    pattern: Regex,
}

impl Default for ProgressGrammar {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTOR)
    }
}

impl ProgressGrammar {
    pub fn new(connector: &str) -> Self {
        let connector = connector.trim().to_lowercase();
        let pattern = RegexBuilder::new(&format!(
            r"(\d+)\s*-\s*(\d+)\s*{}\s*(\d+)",
            regex::escape(&connector)
        ))
        .case_insensitive(true)
        .build()
        .expect("escaped connector always forms a valid pattern");
        Self { connector, pattern }
    }

    pub fn connector(&self) -> &str {
        &self.connector
    }

    /// Parse the first `a - b <connector> c` occurrence in `text` into `(b, c)`.
    pub fn parse(&self, text: &str) -> Result<ProgressState, ExtractError> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| {
                let end = caps[2].parse().ok()?;
                let total = caps[3].parse().ok()?;
                Some(ProgressState { end, total })
            })
            .ok_or_else(|| ExtractError::ProgressParse {
                text: text.to_string(),
            })
    }

    /// Find the counter near `marker` in a page snapshot and parse it.
    ///
    /// Elements enclosing the marker are tried innermost first, so a counter
    /// split across inline tags still parses.
    pub fn read(&self, view: &PageView, marker: &str) -> Result<ProgressState, ExtractError> {
        let mut nearest = None;
        for text in view.texts_around(marker) {
            if let Ok(progress) = self.parse(&text) {
                return Ok(progress);
            }
            nearest.get_or_insert(text);
        }
        Err(ExtractError::ProgressParse {
            text: nearest.unwrap_or_default(),
        })
    }
}
