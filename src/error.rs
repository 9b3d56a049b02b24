//! Extraction error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that abort an extraction session.
///
/// A page that refuses to advance is not an error: it surfaces as
/// [`AdvanceOutcome::Stuck`](crate::extract::AdvanceOutcome::Stuck) and ends
/// the session with a partial result.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{field} options did not populate within {}s", timeout.as_secs())]
    FormNotReady { field: String, timeout: Duration },

    #[error("{field} has no option labelled {label:?}")]
    OptionNotFound { field: String, label: String },

    #[error("Results table not found on page")]
    TableNotFound,

    #[error("Could not parse results counter: {text:?}")]
    ProgressParse { text: String },

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ExtractError {
    /// Wrap any driver-level failure.
    pub fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}
