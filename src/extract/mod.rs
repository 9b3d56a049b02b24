//! Pagination-driven extraction engine.
//!
//! The engine reads a results page through the [`ResultsPage`] seam: rows
//! go into a deduplicating [`RecordStore`], the counter decides whether the
//! listing is complete, and the [`AdvanceController`] moves to the next page
//! until either the counter is satisfied or the page stops advancing.

mod advance;
mod fingerprint;
mod page;
mod progress;
mod reader;
mod rows;
mod session;
mod store;
mod view;
pub mod wait;

pub use advance::{AdvanceController, AdvanceOutcome, AdvancePolicy, AdvanceState, StuckReason};
pub use fingerprint::{fingerprint, PageFingerprint};
pub use page::{FormDriver, NextControl, ResultsPage};
pub use progress::{ProgressGrammar, ProgressState, DEFAULT_CONNECTOR, DEFAULT_COUNTER_MARKER};
pub use reader::PageReader;
pub use rows::{extract_rows, TableMarkers};
pub use session::{
    NoProgress, PageReport, ProgressSink, Session, SessionError, SessionOptions, SessionResult,
    SessionStatus, StopReason,
};
pub use store::RecordStore;
pub use view::PageView;
pub use wait::{wait_for, wait_until};
