//! Headless browser rendering for JavaScript-heavy pages.
//!
//! This module is only available when the `headless` Cargo feature is
//! enabled. It provides a shared browser process and a `PageFetcher` that
//! renders pages via the Chrome DevTools Protocol. Browser-mode jobs fall
//! back to the plain HTTP fetcher when no Chrome binary can be found or the
//! render fails; errors from here are treated as transient by that policy.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};

use crate::fetcher::PageFetcher;
use crate::{Result, SiftError};

/// Default time budget for one rendered fetch, in seconds.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;

/// Chrome binary names probed when no explicit path is configured.
const CHROME_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Configuration for the shared browser process.
#[derive(Debug, Clone)]
pub struct BrowserPoolConfig {
    /// Maximum number of concurrent browser tabs.
    pub max_tabs: usize,
    /// Whether to run the browser in headless mode.
    pub headless: bool,
    /// Path to the Chrome/Chromium executable. If `None`, auto-detected.
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserPoolConfig {
    fn default() -> Self {
        Self {
            max_tabs: 4,
            headless: true,
            chrome_path: None,
        }
    }
}

/// A shared, lazily-launched browser process with tab concurrency control.
///
/// The browser is launched on the first `acquire_browser()` call; a
/// semaphore caps the number of simultaneously open tabs.
pub struct BrowserPool {
    config: BrowserPoolConfig,
    browser: Mutex<Option<Arc<Browser>>>,
    tab_semaphore: Arc<Semaphore>,
}

impl BrowserPool {
    /// Creates a new browser pool with the given configuration.
    pub fn new(config: BrowserPoolConfig) -> Self {
        let max_tabs = config.max_tabs.max(1);
        Self {
            config,
            browser: Mutex::new(None),
            tab_semaphore: Arc::new(Semaphore::new(max_tabs)),
        }
    }

    /// Returns the tab semaphore for acquiring permits before opening tabs.
    pub fn tab_semaphore(&self) -> &Arc<Semaphore> {
        &self.tab_semaphore
    }

    /// Lazily launches the browser and returns a shared handle.
    pub async fn acquire_browser(&self) -> Result<Arc<Browser>> {
        let mut guard = self.browser.lock().await;

        if let Some(ref browser) = *guard {
            return Ok(Arc::clone(browser));
        }

        let chrome = match &self.config.chrome_path {
            Some(path) => path.clone(),
            None => find_chrome()?,
        };
        debug!(chrome = %chrome.display(), "Launching headless browser");

        let mut builder = BrowserConfig::builder().chrome_executable(chrome);

        if self.config.headless {
            builder = builder.arg("--headless=new");
        }

        builder = builder
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--mute-audio")
            .arg("--no-first-run");

        let browser_config = builder
            .build()
            .map_err(|e| SiftError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SiftError::Browser(format!("Failed to launch browser: {}", e)))?;

        // The CDP event handler must be polled for the browser to make
        // progress.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser CDP handler error: {}", e);
                }
            }
            debug!("Browser CDP handler exited");
        });

        let browser = Arc::new(browser);
        *guard = Some(Arc::clone(&browser));

        Ok(browser)
    }

    /// Shuts down the browser process.
    pub async fn shutdown(&self) {
        let mut guard = self.browser.lock().await;
        if guard.take().is_some() {
            debug!("Browser pool shut down");
        }
    }
}

/// Locates a Chrome/Chromium binary on the PATH.
fn find_chrome() -> Result<PathBuf> {
    for candidate in CHROME_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(SiftError::Browser(
        "No Chrome/Chromium binary found on PATH".to_string(),
    ))
}

/// A `PageFetcher` that renders pages with a headless browser.
///
/// Each `fetch()` opens a tab, waits for navigation, reads the rendered DOM
/// and closes the tab, all under a fixed time budget.
pub struct BrowserFetcher {
    pool: Arc<BrowserPool>,
    timeout: Duration,
}

impl BrowserFetcher {
    /// Creates a fetcher over an existing pool.
    pub fn new(pool: Arc<BrowserPool>) -> Self {
        Self {
            pool,
            timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
        }
    }

    /// Creates a fetcher with its own default pool.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(BrowserPool::new(BrowserPoolConfig::default())))
    }

    /// Sets the per-fetch time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn render(&self, url: &str) -> Result<String> {
        let _permit = self
            .pool
            .tab_semaphore()
            .acquire()
            .await
            .map_err(|e| SiftError::Browser(format!("Tab semaphore closed: {}", e)))?;

        let browser = self.pool.acquire_browser().await?;

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| SiftError::Browser(format!("Failed to open tab: {}", e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| SiftError::Browser(format!("Navigation wait failed: {}", e)))?;

        let html = page
            .content()
            .await
            .map_err(|e| SiftError::Browser(format!("Failed to get page content: {}", e)))?;

        // Best-effort: a leaked tab is reclaimed when the browser exits.
        if let Err(e) = page.close().await {
            warn!("Failed to close browser tab: {}", e);
        }

        Ok(html)
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(SiftError::Timeout(self.timeout.as_secs())),
        }
    }
}
