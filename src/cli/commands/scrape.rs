//! `farmacie scrape`.

use std::path::{Path, PathBuf};

use chrono::Local;
use console::style;

use crate::browser;
use crate::cli::progress::PageProgress;
use crate::config::Config;
use crate::extract::{SessionError, SessionStatus};
use crate::models::SearchFilters;
use crate::output::{self, OutputFormat};
use crate::utils::slug;

pub struct ScrapeArgs {
    pub region: String,
    pub province: String,
    pub municipality: Option<String>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

pub async fn cmd_scrape(config: &Config, args: ScrapeArgs) -> anyhow::Result<()> {
    let mut filters = SearchFilters::new(args.region, args.province);
    if let Some(municipality) = args.municipality {
        filters = filters.with_municipality(municipality);
    }

    let path = args.output.unwrap_or_else(|| {
        config
            .output
            .directory()
            .join(default_file_name(&filters, args.format, &Local::now().format("%Y%m%d").to_string()))
    });

    println!(
        "{} Searching {}",
        style("→").cyan(),
        style(filters.describe()).bold()
    );

    let progress = PageProgress::new(&filters.describe());
    let outcome = browser::scrape(config, &filters, &progress).await;
    progress.finish();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            match e.downcast_ref::<SessionError>() {
                Some(session) => println!(
                    "{} Extraction failed after {} records: {}",
                    style("✗").red(),
                    session.partial.len(),
                    session.source
                ),
                None => println!("{} Extraction failed: {}", style("✗").red(), e),
            }
            return Err(e);
        }
    };

    output::write_result(&result, &path, args.format, config.output.bom)?;

    match result.status {
        SessionStatus::Complete => println!(
            "{} {} pharmacies over {} pages",
            style("✓").green(),
            result.records.len(),
            result.pages
        ),
        SessionStatus::StuckPartial(ref reason) => println!(
            "{} Partial result: {} pharmacies over {} pages ({}{})",
            style("!").yellow(),
            result.records.len(),
            result.pages,
            reason,
            result
                .last_progress
                .map(|p| format!(", counter at {}", p))
                .unwrap_or_default()
        ),
    }
    println!("  {} {}", style("Saved:").dim(), display(&path));

    Ok(())
}

/// `farmacie_<region>_<province>[_<municipality>]_<date>.<ext>`.
fn default_file_name(filters: &SearchFilters, format: OutputFormat, date: &str) -> String {
    let mut parts = vec![slug(&filters.region), slug(&filters.province)];
    if let Some(ref municipality) = filters.municipality {
        parts.push(slug(municipality));
    }
    format!(
        "farmacie_{}_{}.{}",
        parts.join("_"),
        date,
        format.extension()
    )
}

fn display(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
