//! Moving to the next results page and confirming that it happened.
//!
//! The directory's "next" control never reliably signals that it is
//! disabled, and a click can be silently ignored while the page is busy. An
//! advance is therefore only trusted once the page itself shows it: either
//! the counter's range end grew, or the first row of the table changed.
//! Either signal is enough, since the counter can lag behind the table and
//! adjacent pages can start with the same row text. Attempts are bounded, so
//! a control that simply does nothing on the last page ends in
//! [`AdvanceOutcome::Stuck`] instead of looping.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fingerprint::PageFingerprint;
use super::page::{NextControl, ResultsPage};
use super::progress::ProgressState;
use super::reader::PageReader;
use super::wait::{wait_for, DEFAULT_POLL_INTERVAL};

/// Retry budget and timings for one advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancePolicy {
    /// Clicks attempted before giving up.
    pub max_retries: u32,
    /// How long each click is given to show an effect.
    pub attempt_timeout: Duration,
    /// Pause after an attempt that showed no effect.
    pub backoff: Duration,
    /// Delay between two page reads while waiting.
    pub poll_interval: Duration,
    /// Pause after the click itself failed.
    pub click_failure_pause: Duration,
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self {
            max_retries: 7,
            attempt_timeout: Duration::from_secs(15),
            backoff: Duration::from_millis(600),
            poll_interval: DEFAULT_POLL_INTERVAL,
            click_failure_pause: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceState {
    Idle,
    Advancing { attempt: u32 },
    Settled,
    Stuck,
}

/// Why pagination could not continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StuckReason {
    /// No visible "next" control: end of data.
    NoControl,
    /// Every attempt timed out without a page change.
    RetriesExhausted { attempts: u32 },
}

impl std::fmt::Display for StuckReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StuckReason::NoControl => write!(f, "no next-page control"),
            StuckReason::RetriesExhausted { attempts } => {
                write!(f, "page did not change after {} attempts", attempts)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The page changed. `progress` is `None` when only the table had
    /// re-rendered at the moment of detection.
    Settled {
        progress: Option<ProgressState>,
        fingerprint: PageFingerprint,
    },
    Stuck(StuckReason),
}

/// Drives the "next page" control of one results page.
pub struct AdvanceController<'a, P: ResultsPage + ?Sized> {
    page: &'a P,
    reader: &'a PageReader,
    policy: &'a AdvancePolicy,
    state: AdvanceState,
}

impl<'a, P: ResultsPage + ?Sized> AdvanceController<'a, P> {
    pub fn new(page: &'a P, reader: &'a PageReader, policy: &'a AdvancePolicy) -> Self {
        Self {
            page,
            reader,
            policy,
            state: AdvanceState::Idle,
        }
    }

    pub fn state(&self) -> AdvanceState {
        self.state
    }

    /// Advance past the page whose counter ended at `previous_end` and whose
    /// first row reads `previous_fingerprint`.
    pub async fn advance(&mut self, previous_end: u64, previous_fingerprint: &PageFingerprint) -> AdvanceOutcome {
        self.state = AdvanceState::Advancing { attempt: 0 };

        match self.page.next_control().await {
            Ok(NextControl::Available) => {}
            Ok(control) => {
                debug!("Next control is {:?}, treating as end of data", control);
                return self.stuck(StuckReason::NoControl);
            }
            // Missing or hidden is end of data; unreadable is not.
            Err(e) => warn!("Could not inspect next control, trying to click anyway: {}", e),
        }

        let max = self.policy.max_retries;
        for attempt in 1..=max {
            self.state = AdvanceState::Advancing { attempt };

            if let Err(e) = self.page.click_next().await {
                warn!("Next click failed (attempt {}/{}): {}", attempt, max, e);
                tokio::time::sleep(self.policy.click_failure_pause).await;
                continue;
            }

            let (page, reader) = (self.page, self.reader);
            let changed = wait_for(
                move || page_changed(page, reader, previous_end, previous_fingerprint),
                self.policy.attempt_timeout,
                self.policy.poll_interval,
            )
            .await;

            if let Some((progress, fingerprint)) = changed {
                debug!("Page advanced on attempt {}/{}", attempt, max);
                self.state = AdvanceState::Settled;
                return AdvanceOutcome::Settled { progress, fingerprint };
            }

            debug!(
                "No page change within {:?} (attempt {}/{})",
                self.policy.attempt_timeout, attempt, max
            );
            if attempt < max {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        self.stuck(StuckReason::RetriesExhausted { attempts: max })
    }

    fn stuck(&mut self, reason: StuckReason) -> AdvanceOutcome {
        self.state = AdvanceState::Stuck;
        AdvanceOutcome::Stuck(reason)
    }
}

/// One read of the page: `Some` once either change signal holds.
async fn page_changed<P: ResultsPage + ?Sized>(
    page: &P,
    reader: &PageReader,
    previous_end: u64,
    previous_fingerprint: &PageFingerprint,
) -> Option<(Option<ProgressState>, PageFingerprint)> {
    let html = match page.snapshot().await {
        Ok(html) => html,
        Err(e) => {
            debug!("Snapshot failed while waiting for page change: {}", e);
            return None;
        }
    };

    let (progress, fingerprint) = reader.read_lenient(&html);
    let by_counter = progress.is_some_and(|p| p.end > previous_end);
    let by_table = !fingerprint.is_empty() && fingerprint != *previous_fingerprint;

    (by_counter || by_table).then_some((progress, fingerprint))
}
