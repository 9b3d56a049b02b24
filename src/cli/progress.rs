//! Terminal progress for a running session.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::extract::{PageReport, ProgressSink, SessionStatus};

/// Progress bar tracking the results counter.
pub struct PageProgress {
    bar: ProgressBar,
}

impl PageProgress {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(format!("Searching {}...", label));
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for PageProgress {
    fn page_read(&self, report: &PageReport) {
        self.bar.set_length(report.progress.total);
        self.bar.set_position(report.progress.end);
        self.bar.set_message(format!(
            "page {} · {} stored",
            report.page, report.stored
        ));
    }

    fn stopped(&self, status: &SessionStatus) {
        if let SessionStatus::StuckPartial(reason) = status {
            self.bar
                .println(format!("  {} stopped early: {}", style("!").yellow(), reason));
        }
    }
}
