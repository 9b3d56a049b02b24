//! Chrome lifecycle: launch or attach, open the search page, shut down.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserSettings;

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// A running (or attached) browser plus the task draining its CDP events.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Attached to someone else's browser: never close it.
    remote: bool,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launch a local Chrome, or attach to `remote_url` when configured.
    pub async fn start(settings: &BrowserSettings) -> Result<Self> {
        let navigation_timeout = Duration::from_secs(settings.navigation_timeout_secs);

        if let Some(ref remote_url) = settings.remote_url {
            let (browser, handler) = connect_remote(remote_url).await?;
            return Ok(Self {
                browser,
                handler,
                remote: true,
                navigation_timeout,
            });
        }

        info!("Launching browser (headless={})", settings.headless);
        let chrome_path = find_chrome(settings.chrome_path.as_deref())?;

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);

        // with_head means NOT headless
        if !settings.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--lang=it-IT");

        for arg in &settings.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        Ok(Self {
            browser,
            handler: drain(handler),
            remote: false,
            navigation_timeout,
        })
    }

    /// Open a fresh tab on `url` and wait for the navigation to finish.
    pub async fn open(&self, url: &str) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create page")?;

        debug!("Navigating to {}", url);
        tokio::time::timeout(self.navigation_timeout, page.goto(url))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Navigation to {} timed out after {}s",
                    url,
                    self.navigation_timeout.as_secs()
                )
            })?
            .with_context(|| format!("Failed to navigate to {}", url))?;

        Ok(page)
    }

    /// Shut the browser down. Attached browsers are only disconnected.
    pub async fn close(mut self) {
        if !self.remote {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("Browser process wait failed: {}", e);
            }
        }
        self.handler.abort();
    }
}

/// Attach to a remote Chrome via its `/json/version` endpoint.
async fn connect_remote(url: &str) -> Result<(Browser, JoinHandle<()>)> {
    info!("Connecting to remote browser at {}", url);

    let http_url = url
        .replace("ws://", "http://")
        .replace("wss://", "https://");
    let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

    let resp: serde_json::Value = reqwest::Client::new()
        .get(&version_url)
        .send()
        .await
        .context("Failed to connect to remote browser")?
        .json()
        .await
        .context("Failed to parse browser version info")?;

    let ws_url = resp
        .get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("No webSocketDebuggerUrl in response"))?;

    info!("Connecting to WebSocket: {}", ws_url);

    let (browser, handler) = Browser::connect(ws_url)
        .await
        .context("Failed to connect to remote browser")?;

    Ok((browser, drain(handler)))
}

fn drain(mut handler: chromiumoxide::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    })
}

/// Resolve the Chrome executable: configured path, known locations, then PATH.
fn find_chrome(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("Configured Chrome not found at {}", path.display());
    }

    for path in CHROME_PATHS {
        let p = Path::new(path);
        if p.exists() {
            info!("Found Chrome at: {}", path);
            return Ok(p.to_path_buf());
        }
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(path) = which::which(cmd) {
            info!("Found Chrome in PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium not found. Please install it:\n\
         - Arch/Manjaro: sudo pacman -S chromium\n\
         - Ubuntu/Debian: sudo apt install chromium-browser\n\
         - Fedora: sudo dnf install chromium\n\
         - Or set FARMACIE_CHROME / browser.chrome_path"
    ))
}
