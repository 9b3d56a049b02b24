//! Scripted results pages for driving the engine without a browser.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use farmacie::error::ExtractError;
use farmacie::extract::{NextControl, PageReport, ProgressSink, ResultsPage, SessionStatus};
use farmacie::models::Record;

/// A fixed sequence of HTML pages behind a "next" control.
pub struct ScriptedPage {
    pages: Vec<String>,
    current: AtomicUsize,
    clicks: AtomicU32,
    pending: AtomicU32,
    clicks_per_advance: u32,
    frozen_from: Option<usize>,
    failing_clicks: u32,
    control: NextControl,
    inspect_fails: bool,
}

impl ScriptedPage {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            current: AtomicUsize::new(0),
            clicks: AtomicU32::new(0),
            pending: AtomicU32::new(0),
            clicks_per_advance: 1,
            frozen_from: None,
            failing_clicks: 0,
            control: NextControl::Available,
            inspect_fails: false,
        }
    }

    /// Clicks are accepted but ignored once page `index` is shown.
    pub fn frozen_from(mut self, index: usize) -> Self {
        self.frozen_from = Some(index);
        self
    }

    /// Only every `k`-th click takes effect.
    pub fn clicks_per_advance(mut self, k: u32) -> Self {
        self.clicks_per_advance = k;
        self
    }

    /// The first `n` clicks fail outright.
    pub fn failing_clicks(mut self, n: u32) -> Self {
        self.failing_clicks = n;
        self
    }

    pub fn control(mut self, control: NextControl) -> Self {
        self.control = control;
        self
    }

    /// Inspecting the "next" control always errors.
    pub fn inspect_fails(mut self) -> Self {
        self.inspect_fails = true;
        self
    }

    pub fn clicks(&self) -> u32 {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultsPage for ScriptedPage {
    async fn snapshot(&self) -> Result<String, ExtractError> {
        Ok(self.pages[self.current()].clone())
    }

    async fn next_control(&self) -> Result<NextControl, ExtractError> {
        if self.inspect_fails {
            return Err(ExtractError::browser("execution context was destroyed"));
        }
        Ok(self.control)
    }

    async fn click_next(&self) -> Result<(), ExtractError> {
        let click = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;
        if click <= self.failing_clicks {
            return Err(ExtractError::browser("node is detached from document"));
        }

        let current = self.current();
        let frozen = self.frozen_from.is_some_and(|index| current >= index);
        if frozen || current + 1 >= self.pages.len() {
            return Ok(());
        }

        if self.pending.fetch_add(1, Ordering::SeqCst) + 1 >= self.clicks_per_advance {
            self.pending.store(0, Ordering::SeqCst);
            self.current.store(current + 1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Sink remembering every report.
#[derive(Default)]
pub struct RecordingSink {
    pub reports: Mutex<Vec<PageReport>>,
    pub status: Mutex<Option<SessionStatus>>,
}

impl ProgressSink for RecordingSink {
    fn page_read(&self, report: &PageReport) {
        self.reports.lock().unwrap().push(*report);
    }

    fn stopped(&self, status: &SessionStatus) {
        *self.status.lock().unwrap() = Some(*status);
    }
}

/// The eight cells of the pharmacy labelled `name`.
pub fn cells(name: &str) -> [String; 8] {
    [
        format!("FARMACIA {}", name),
        format!("VIA {} 1", name),
        "00100".to_string(),
        "ROMA".to_string(),
        "RM".to_string(),
        "LAZIO".to_string(),
        format!("C{}", name),
        format!("P{}", name),
    ]
}

/// A results page listing `names`, with counter `start - end di total`.
pub fn results_page(names: &[&str], start: u64, end: u64, total: u64) -> String {
    let counter = format!("risultati {} - {} di {}", start, end, total);
    page_with_counter(names, &counter)
}

/// A results page with arbitrary counter text.
pub fn page_with_counter(names: &[&str], counter: &str) -> String {
    let rows: String = names
        .iter()
        .map(|name| {
            let cells: String = cells(name)
                .iter()
                .map(|cell| format!("<td>{}</td>", cell))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    format!(
        r##"<html><body>
        <div class="paginazione"><span>{counter}</span><a title="Pagina successiva" href="#">&gt;</a></div>
        <table class="risultati">
          <thead><tr><th>Denominazione</th><th>Indirizzo</th><th>CAP</th><th>Comune</th>
            <th>Provincia</th><th>Regione</th><th>Codice</th><th>Partita IVA</th></tr></thead>
          <tbody>{rows}</tbody>
        </table>
        </body></html>"##,
        counter = counter,
        rows = rows
    )
}

/// A page where the search has not produced a results table.
pub fn empty_page() -> String {
    "<html><body><form><select name='reg'></select></form></body></html>".to_string()
}

/// Short names (`"A"`, `"B"`, ...) of `records`, in order.
pub fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.denomination().trim_start_matches("FARMACIA ").to_string())
        .collect()
}
