//! The extract, track, decide, advance loop.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::advance::{AdvanceController, AdvanceOutcome, AdvancePolicy, StuckReason};
use super::fingerprint::PageFingerprint;
use super::page::ResultsPage;
use super::progress::ProgressState;
use super::reader::PageReader;
use super::store::RecordStore;
use super::view::PageView;
use crate::error::ExtractError;
use crate::models::Record;

/// Loop settings for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub policy: AdvancePolicy,
    /// Stop after this many pages even if the counter says there are more.
    pub max_pages: Option<usize>,
}

/// Why a session ended before the counter reached the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    Advance(StuckReason),
    PageLimit { pages: usize },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Advance(reason) => write!(f, "{}", reason),
            StopReason::PageLimit { pages } => write!(f, "page limit of {} reached", pages),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The counter reached the total.
    Complete,
    /// Pagination stopped early; the records collected so far are kept.
    StuckPartial(StopReason),
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Complete => "complete",
            SessionStatus::StuckPartial(_) => "stuck_partial",
        }
    }
}

/// Unique records in first-seen order and how the session ended.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub records: Vec<Record>,
    pub status: SessionStatus,
    /// Pages read, including the first.
    pub pages: usize,
    pub last_progress: Option<ProgressState>,
}

impl SessionResult {
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }
}

/// A fatal error together with whatever was collected before it.
#[derive(Debug, Error)]
#[error("{source} (after collecting {collected} records)", collected = .partial.len())]
pub struct SessionError {
    pub source: ExtractError,
    pub partial: RecordStore,
}

/// Summary of one page read, handed to a [`ProgressSink`].
#[derive(Debug, Clone, Copy)]
pub struct PageReport {
    pub page: usize,
    pub progress: ProgressState,
    pub rows: usize,
    pub added: usize,
    pub stored: usize,
}

/// Observer for per-page progress.
pub trait ProgressSink: Send + Sync {
    fn page_read(&self, report: &PageReport);

    fn stopped(&self, _status: &SessionStatus) {}
}

/// Sink that ignores everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn page_read(&self, _report: &PageReport) {}
}

struct Ingested {
    rows: usize,
    added: usize,
    progress: ProgressState,
    fingerprint: PageFingerprint,
}

/// Paginates through one results listing.
pub struct Session<'a, P: ResultsPage + ?Sized> {
    page: &'a P,
    reader: &'a PageReader,
    options: SessionOptions,
    sink: &'a dyn ProgressSink,
}

impl<'a, P: ResultsPage + ?Sized> Session<'a, P> {
    pub fn new(page: &'a P, reader: &'a PageReader, options: SessionOptions) -> Self {
        Self {
            page,
            reader,
            options,
            sink: &NoProgress,
        }
    }

    pub fn with_sink(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.sink = sink;
        self
    }

    /// Read every page into `store` until the counter is complete or the
    /// page cannot be advanced.
    ///
    /// A page that will not advance ends the session with
    /// [`SessionStatus::StuckPartial`]; only unreadable pages are errors.
    pub async fn run(&self, mut store: RecordStore) -> Result<SessionResult, SessionError> {
        let mut controller = AdvanceController::new(self.page, self.reader, &self.options.policy);
        let mut pages = 0;
        let mut total: Option<u64> = None;

        loop {
            let html = match self.page.snapshot().await {
                Ok(html) => html,
                Err(source) => return Err(SessionError { source, partial: store }),
            };
            let page = match self.ingest(&html, &mut store) {
                Ok(page) => page,
                Err(source) => return Err(SessionError { source, partial: store }),
            };
            pages += 1;

            let progress = page.progress;
            if let Some(previous) = total.filter(|t| *t != progress.total) {
                warn!(
                    "Result total changed from {} to {}, continuing with the new total",
                    previous, progress.total
                );
            }
            total = Some(progress.total);

            info!(
                "Progress: {} (page {}, {} new, {} stored)",
                progress,
                pages,
                page.added,
                store.len()
            );
            self.sink.page_read(&PageReport {
                page: pages,
                progress,
                rows: page.rows,
                added: page.added,
                stored: store.len(),
            });

            if progress.is_complete() {
                return Ok(self.finish(store, SessionStatus::Complete, pages, progress));
            }

            if let Some(max) = self.options.max_pages.filter(|max| pages >= *max) {
                let status = SessionStatus::StuckPartial(StopReason::PageLimit { pages: max });
                warn!("Stopping at page limit ({}) with {} records", max, store.len());
                return Ok(self.finish(store, status, pages, progress));
            }

            match controller.advance(progress.end, &page.fingerprint).await {
                AdvanceOutcome::Settled { progress: next, .. } => {
                    debug!("Advanced to page {} (counter {:?})", pages + 1, next);
                }
                AdvanceOutcome::Stuck(reason) => {
                    warn!(
                        "Could not advance past {} ({}), keeping {} records",
                        progress,
                        reason,
                        store.len()
                    );
                    let status = SessionStatus::StuckPartial(StopReason::Advance(reason));
                    return Ok(self.finish(store, status, pages, progress));
                }
            }
        }
    }

    fn ingest(&self, html: &str, store: &mut RecordStore) -> Result<Ingested, ExtractError> {
        let view = PageView::parse(html);
        let rows = self.reader.rows(&view)?;
        let count = rows.len();
        let added = store.add(rows);
        let progress = self.reader.progress(&view)?;

        Ok(Ingested {
            rows: count,
            added,
            progress,
            fingerprint: self.reader.fingerprint(&view),
        })
    }

    fn finish(
        &self,
        store: RecordStore,
        status: SessionStatus,
        pages: usize,
        progress: ProgressState,
    ) -> SessionResult {
        self.sink.stopped(&status);
        SessionResult {
            records: store.into_records(),
            status,
            pages,
            last_progress: Some(progress),
        }
    }
}
