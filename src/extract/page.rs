//! Seams between the extraction engine and a live page.

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::models::SearchFilters;

/// State of the "next page" control as rendered right now.
///
/// Disabled-state markup is deliberately absent: the directory does not set
/// it reliably, so a present control is always tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    /// No matching element on the page.
    Missing,
    /// Element exists but is not visible.
    Hidden,
    /// Element can be clicked.
    Available,
}

impl NextControl {
    pub fn is_available(self) -> bool {
        self == NextControl::Available
    }
}

/// A results page the engine can read and advance.
#[async_trait]
pub trait ResultsPage: Send + Sync {
    /// Current HTML of the page.
    async fn snapshot(&self) -> Result<String, ExtractError>;

    /// Inspect the "next page" control.
    async fn next_control(&self) -> Result<NextControl, ExtractError>;

    /// Trigger the "next page" control once.
    ///
    /// Repeated triggers are allowed; the engine never assumes a click took
    /// effect until the page content confirms it.
    async fn click_next(&self) -> Result<(), ExtractError>;
}

/// Fills the cascading search form and submits it.
#[async_trait]
pub trait FormDriver: Send + Sync {
    /// Select region, province and municipality (or all municipalities),
    /// waiting for each dependent option list to populate, then submit.
    ///
    /// Fails with [`ExtractError::FormNotReady`] when an option list never
    /// populates and [`ExtractError::OptionNotFound`] when a label is absent.
    async fn select_filters(&self, filters: &SearchFilters) -> Result<(), ExtractError>;
}
