//! Live extraction against the directory in Chrome.
//!
//! Requires the `browser` feature; without it [`scrape`] returns an error.

#[cfg(feature = "browser")]
mod page;
#[cfg(feature = "browser")]
mod scripts;
#[cfg(feature = "browser")]
mod session;

#[cfg(feature = "browser")]
pub use page::{ChromePage, FormControls};
#[cfg(feature = "browser")]
pub use session::BrowserSession;

#[cfg(feature = "browser")]
use anyhow::Context;
#[cfg(feature = "browser")]
use tracing::info;

use crate::config::Config;
#[cfg(feature = "browser")]
use crate::error::ExtractError;
#[cfg(feature = "browser")]
use crate::extract::{
    wait::DEFAULT_POLL_INTERVAL, wait_until, FormDriver, RecordStore, ResultsPage, Session,
};
use crate::extract::{ProgressSink, SessionResult};
use crate::models::SearchFilters;

/// Run a complete search: open the directory, apply `filters`, and page
/// through the results.
///
/// The browser is closed on every exit path. A fatal engine error comes back
/// as a [`SessionError`](crate::extract::SessionError) inside the
/// `anyhow::Error`, carrying the records collected before it happened.
#[cfg(feature = "browser")]
pub async fn scrape(
    config: &Config,
    filters: &SearchFilters,
    sink: &dyn ProgressSink,
) -> anyhow::Result<SessionResult> {
    let browser = BrowserSession::start(&config.browser).await?;
    let result = scrape_with(&browser, config, filters, sink).await;
    browser.close().await;
    result
}

#[cfg(feature = "browser")]
async fn scrape_with(
    browser: &BrowserSession,
    config: &Config,
    filters: &SearchFilters,
    sink: &dyn ProgressSink,
) -> anyhow::Result<SessionResult> {
    let page = ChromePage::new(browser.open(&config.site.url).await?, &config.site);
    let reader = config.site.page_reader();

    page.select_filters(filters)
        .await
        .with_context(|| format!("Search form failed for {}", filters.describe()))?;

    let (results, reader_ref) = (&page, &reader);
    let table_ready = wait_until(
        move || async move {
            results
                .snapshot()
                .await
                .map(|html| reader_ref.has_table(&html))
                .unwrap_or(false)
        },
        config.site.table_timeout(),
        DEFAULT_POLL_INTERVAL,
    )
    .await;
    if !table_ready {
        return Err(ExtractError::TableNotFound.into());
    }
    info!("Results table rendered");

    let session = Session::new(&page, &reader, config.pagination.session_options()).with_sink(sink);
    Ok(session.run(RecordStore::new()).await?)
}

#[cfg(not(feature = "browser"))]
pub async fn scrape(
    _config: &Config,
    _filters: &SearchFilters,
    _sink: &dyn ProgressSink,
) -> anyhow::Result<SessionResult> {
    Err(anyhow::anyhow!(
        "Browser support not compiled. Rebuild with: cargo build --features browser"
    ))
}
