//! [`ResultsPage`] and [`FormDriver`] over a live Chrome tab.

use async_trait::async_trait;
use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::scripts;
use crate::config::SiteConfig;
use crate::error::ExtractError;
use crate::extract::wait::DEFAULT_POLL_INTERVAL;
use crate::extract::{wait_until, FormDriver, NextControl, ResultsPage};
use crate::models::SearchFilters;

/// Form controls of the search page.
#[derive(Debug, Clone)]
pub struct FormControls {
    pub region: &'static str,
    pub province: &'static str,
    pub municipality: &'static str,
    pub submit_label: &'static str,
}

impl Default for FormControls {
    fn default() -> Self {
        Self {
            region: "select[name='reg']",
            province: "select[name='prv']",
            municipality: "select[name='com']",
            submit_label: "Cerca",
        }
    }
}

/// A Chrome tab showing the directory.
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
    controls: FormControls,
    site: SiteConfig,
    poll_interval: Duration,
}

impl ChromePage {
    pub fn new(page: Page, site: &SiteConfig) -> Self {
        Self {
            page,
            controls: FormControls::default(),
            site: site.clone(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, ExtractError> {
        self.page
            .evaluate(script)
            .await
            .map_err(ExtractError::browser)?
            .into_value()
            .map_err(ExtractError::browser)
    }

    /// Wait until `selector` has real options.
    async fn options_ready(&self, field: &str, selector: &str) -> Result<(), ExtractError> {
        let ready = wait_until(
            move || async move {
                self.eval::<bool>(scripts::options_ready(selector))
                    .await
                    .unwrap_or(false)
            },
            self.site.form_timeout(),
            self.poll_interval,
        )
        .await;

        if ready {
            Ok(())
        } else {
            Err(ExtractError::FormNotReady {
                field: field.to_string(),
                timeout: self.site.form_timeout(),
            })
        }
    }

    /// Wait for `selector`, then pick the first of `labels` present.
    async fn choose(
        &self,
        field: &str,
        selector: &str,
        labels: Vec<String>,
    ) -> Result<(), ExtractError> {
        self.options_ready(field, selector).await?;

        let selected: String = self
            .eval(scripts::select_by_label(selector, &labels))
            .await?;

        match Some(selected).filter(|label| !label.is_empty()) {
            Some(label) => {
                debug!("Selected {} {:?}", field, label);
                Ok(())
            }
            None => Err(ExtractError::OptionNotFound {
                field: field.to_string(),
                label: labels.into_iter().next().unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl ResultsPage for ChromePage {
    async fn snapshot(&self) -> Result<String, ExtractError> {
        self.page.content().await.map_err(ExtractError::browser)
    }

    async fn next_control(&self) -> Result<NextControl, ExtractError> {
        let state: String = self.eval(scripts::next_control_state()).await?;
        Ok(match state.as_str() {
            "available" => NextControl::Available,
            "hidden" => NextControl::Hidden,
            _ => NextControl::Missing,
        })
    }

    async fn click_next(&self) -> Result<(), ExtractError> {
        let clicked: bool = self.eval(scripts::click_next()).await?;
        if clicked {
            Ok(())
        } else {
            Err(ExtractError::browser("next control disappeared before click"))
        }
    }
}

#[async_trait]
impl FormDriver for ChromePage {
    async fn select_filters(&self, filters: &SearchFilters) -> Result<(), ExtractError> {
        let controls = self.controls.clone();

        self.choose("region", controls.region, vec![filters.region.clone()])
            .await?;
        self.choose(
            "province",
            controls.province,
            self.site.province_labels(&filters.province),
        )
        .await?;

        match filters.municipality {
            Some(ref municipality) => {
                self.choose(
                    "municipality",
                    controls.municipality,
                    vec![municipality.clone()],
                )
                .await?
            }
            None => {
                self.options_ready("municipality", controls.municipality)
                    .await?;
                let _: bool = self.eval(scripts::select_first(controls.municipality)).await?;
            }
        }

        let submitted: bool = self.eval(scripts::submit(controls.submit_label)).await?;
        if !submitted {
            return Err(ExtractError::browser(format!(
                "submit control {:?} not found",
                controls.submit_label
            )));
        }

        info!("Submitted search: {}", filters.describe());
        Ok(())
    }
}
