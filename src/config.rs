//! Configuration loading.
//!
//! A config file is optional. Lookup order: an explicit `--config` path,
//! then a `farmacie.*` file discovered by `prefer` in the standard config
//! locations, then built-in defaults.
//! Environment variables are applied last, and CLI flags override both.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::{
    AdvancePolicy, PageReader, ProgressGrammar, SessionOptions, TableMarkers, DEFAULT_CONNECTOR,
    DEFAULT_COUNTER_MARKER,
};

/// Public search page of the pharmacy directory.
pub const DEFAULT_SITE_URL: &str = "https://www.salute.gov.it/CercaFarmacie/Ricerca#FINE";

/// Name `prefer` searches for (`farmacie.toml`, `farmacie.json`, ...).
const CONFIG_NAME: &str = "farmacie";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// File this config was read from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Run without a visible window (default: true).
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Chrome/Chromium executable; discovered automatically when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Initial navigation timeout in seconds.
    #[serde(default = "default_long_timeout")]
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            chrome_args: Vec::new(),
            remote_url: None,
            navigation_timeout_secs: default_long_timeout(),
        }
    }
}

/// How the directory's pages are recognised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,
    /// Word labelling the results counter.
    #[serde(default = "default_counter_marker")]
    pub counter_marker: String,
    /// Word between range end and total in the counter.
    #[serde(default = "default_connector")]
    pub connector: String,
    #[serde(default)]
    pub table: TableMarkers,
    /// Seconds to wait for each cascading option list.
    #[serde(default = "default_long_timeout")]
    pub form_timeout_secs: u64,
    /// Seconds to wait for the results table after submitting.
    #[serde(default = "default_long_timeout")]
    pub table_timeout_secs: u64,
    /// Alternative option labels tried when a province label is missing.
    #[serde(default = "default_province_aliases")]
    pub province_aliases: Vec<(String, String)>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            counter_marker: default_counter_marker(),
            connector: default_connector(),
            table: TableMarkers::default(),
            form_timeout_secs: default_long_timeout(),
            table_timeout_secs: default_long_timeout(),
            province_aliases: default_province_aliases(),
        }
    }
}

impl SiteConfig {
    pub fn page_reader(&self) -> PageReader {
        PageReader::new(
            ProgressGrammar::new(&self.connector),
            self.counter_marker.clone(),
            self.table.clone(),
        )
    }

    pub fn form_timeout(&self) -> Duration {
        Duration::from_secs(self.form_timeout_secs)
    }

    pub fn table_timeout(&self) -> Duration {
        Duration::from_secs(self.table_timeout_secs)
    }

    /// Labels to try for a province, the requested one first.
    pub fn province_labels(&self, province: &str) -> Vec<String> {
        let mut labels = vec![province.to_string()];
        labels.extend(
            self.province_aliases
                .iter()
                .filter(|(name, _)| name.eq_ignore_ascii_case(province.trim()))
                .map(|(_, alias)| alias.clone()),
        );
        labels
    }
}

/// Advance retry budget and page cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Stop after this many pages (unset = no limit).
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            backoff_ms: default_backoff_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_pages: None,
        }
    }
}

impl PaginationConfig {
    pub fn advance_policy(&self) -> AdvancePolicy {
        AdvancePolicy {
            max_retries: self.max_retries,
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
            backoff: Duration::from_millis(self.backoff_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..AdvancePolicy::default()
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            policy: self.advance_policy(),
            max_pages: self.max_pages,
        }
    }
}

/// Output writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix CSV files with a UTF-8 byte order mark for spreadsheet tools.
    #[serde(default = "default_true")]
    pub bom: bool,
    /// Country literal appended to formatted addresses.
    #[serde(default = "default_country")]
    pub country: String,
    /// Directory for generated file names (default: current directory).
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bom: true,
            country: default_country(),
            directory: None,
        }
    }
}

impl OutputConfig {
    /// Output directory with `~` expanded.
    pub fn directory(&self) -> PathBuf {
        match self.directory {
            Some(ref dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            None => PathBuf::from("."),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_long_timeout() -> u64 {
    60
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_counter_marker() -> String {
    DEFAULT_COUNTER_MARKER.to_string()
}

fn default_connector() -> String {
    DEFAULT_CONNECTOR.to_string()
}

fn default_province_aliases() -> Vec<(String, String)> {
    vec![("ROMA".to_string(), "RM".to_string())]
}

fn default_max_retries() -> u32 {
    7
}

fn default_attempt_timeout_ms() -> u64 {
    15_000
}

fn default_backoff_ms() -> u64 {
    600
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_country() -> String {
    "Italia".to_string()
}

impl Config {
    /// Load from `path`, or from a discovered config file when `None`.
    ///
    /// An explicit path must exist; no discovered file yields defaults.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::discover().await?,
        };
        Ok(config.with_env_overrides())
    }

    /// Use prefer for file discovery, then parse with serde.
    async fn discover() -> anyhow::Result<Self> {
        match prefer::load(CONFIG_NAME).await {
            Ok(found) => match found.source_path() {
                Some(path) => Self::load_from_path(path).await,
                None => Ok(Self::default()),
            },
            Err(e) => {
                debug!("No config file found ({}), using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file path.
    /// TOML or JSON, chosen by file extension.
    pub async fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::parse(&contents, path.extension().and_then(|e| e.to_str()))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, extension: Option<&str>) -> anyhow::Result<Self> {
        Ok(match extension {
            Some("json") => serde_json::from_str(contents)?,
            _ => toml::from_str(contents)?,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// - `FARMACIE_HEADLESS` - "0"/"false" shows the browser window
    /// - `FARMACIE_CHROME` - Chrome executable path
    /// - `BROWSER_URL` - remote DevTools URL
    /// - `FARMACIE_SITE_URL` - search page URL
    /// - `FARMACIE_MAX_RETRIES` - advance attempts per page
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = env::var("FARMACIE_HEADLESS") {
            self.browser.headless = !(value == "0" || value.eq_ignore_ascii_case("false"));
        }

        if let Ok(path) = env::var("FARMACIE_CHROME") {
            if !path.is_empty() {
                self.browser.chrome_path = Some(PathBuf::from(shellexpand::tilde(&path).as_ref()));
            }
        }

        if let Ok(url) = env::var("BROWSER_URL") {
            if !url.is_empty() {
                self.browser.remote_url = Some(url);
            }
        }

        if let Ok(url) = env::var("FARMACIE_SITE_URL") {
            if !url.is_empty() {
                self.site.url = url;
            }
        }

        if let Some(retries) = env::var("FARMACIE_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.pagination.max_retries = retries;
        }

        self
    }

    /// Check values that would make a session meaningless.
    pub fn validate(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.site.url)
            .with_context(|| format!("Invalid site url {:?}", self.site.url))?;
        if self.pagination.max_retries == 0 {
            anyhow::bail!("pagination.max_retries must be at least 1");
        }
        if self.site.connector.trim().is_empty() {
            anyhow::bail!("site.connector must not be empty");
        }
        Ok(())
    }
}
