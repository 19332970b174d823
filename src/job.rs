//! Per-URL extraction jobs: modes, retry budget and delay jitter.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content;
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::result::ExtractionResult;
use crate::summary;
use crate::{Result, SiftError};

/// How a page is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Plain HTTP fetch of server-rendered HTML.
    Light,
    /// Headless-browser rendering; degrades to `Light` when no browser
    /// backend is available.
    #[default]
    Browser,
    /// Deep crawl. No deep backend is wired up yet, so this is served by the
    /// `Browser` path.
    Deep,
}

impl FromStr for ExtractionMode {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Self::Light),
            "browser" => Ok(Self::Browser),
            "deep" => Ok(Self::Deep),
            other => Err(SiftError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Light => "light",
            Self::Browser => "browser",
            Self::Deep => "deep",
        };
        f.write_str(name)
    }
}

/// Inter-retry delay range in seconds, sampled uniformly per retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySpec {
    min_secs: f64,
    max_secs: f64,
}

impl DelaySpec {
    /// No delay between retries.
    pub const NONE: Self = Self {
        min_secs: 0.0,
        max_secs: 0.0,
    };

    /// Creates a delay range; `min` and `max` may be equal for a fixed delay.
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self> {
        if !min_secs.is_finite() || !max_secs.is_finite() || min_secs < 0.0 || max_secs < min_secs
        {
            return Err(SiftError::InvalidDelay(format!("{}-{}", min_secs, max_secs)));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// Lower bound in seconds.
    pub fn min_secs(&self) -> f64 {
        self.min_secs
    }

    /// Upper bound in seconds.
    pub fn max_secs(&self) -> f64 {
        self.max_secs
    }

    /// Whether this spec never produces a delay.
    pub fn is_zero(&self) -> bool {
        self.max_secs == 0.0
    }

    /// Draws one delay from the range.
    pub fn sample(&self) -> Duration {
        let secs = if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            rand::thread_rng().gen_range(self.min_secs..=self.max_secs)
        };
        Duration::from_secs_f64(secs)
    }
}

impl Default for DelaySpec {
    fn default() -> Self {
        Self::NONE
    }
}

impl FromStr for DelaySpec {
    type Err = SiftError;

    /// Parses `"2"` (fixed) or `"1-3"` (range) seconds.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SiftError::InvalidDelay(s.to_string());

        match s.split_once('-') {
            Some((min, max)) => {
                let min = min.trim().parse::<f64>().map_err(|_| invalid())?;
                let max = max.trim().parse::<f64>().map_err(|_| invalid())?;
                Self::new(min, max).map_err(|_| invalid())
            }
            None => {
                let fixed = s.trim().parse::<f64>().map_err(|_| invalid())?;
                Self::new(fixed, fixed).map_err(|_| invalid())
            }
        }
    }
}

/// One unit of work for the scheduler: a URL plus an optional mode override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// URL to extract.
    pub url: String,
    /// Per-URL mode, overriding the extractor's configured mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExtractionMode>,
}

impl JobSpec {
    /// Creates a job spec using the extractor's configured mode.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: None,
        }
    }

    /// Sets a per-URL mode override.
    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Configuration shared by all jobs of one run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Default extraction mode.
    pub mode: ExtractionMode,
    /// Attempt budget per URL (minimum 1).
    pub retries: u32,
    /// Delay range applied before every attempt after the first.
    pub delay: DelaySpec,
    /// Whether to attach a truncation summary to successful results.
    pub summarize: bool,
    /// Word budget for summaries.
    pub summary_words: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            retries: 3,
            delay: DelaySpec::NONE,
            summarize: false,
            summary_words: 200,
        }
    }
}

/// Runs single-URL extraction jobs with bounded retry.
///
/// `extract` never fails: every error is absorbed into an
/// [`ExtractionResult`] with `status = Failed` once the attempt budget is
/// exhausted.
pub struct Extractor {
    light: Arc<dyn PageFetcher>,
    rendered: Option<Arc<dyn PageFetcher>>,
    options: ExtractOptions,
}

impl Extractor {
    /// Creates an extractor with the default fetcher backends.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            light: Arc::new(HttpFetcher::new()),
            rendered: default_rendered_fetcher(),
            options,
        }
    }

    /// Creates an extractor over explicit fetcher backends.
    ///
    /// Passing `None` for `rendered` makes `Browser` and `Deep` jobs degrade
    /// to the light fetcher.
    pub fn with_fetchers(
        light: Arc<dyn PageFetcher>,
        rendered: Option<Arc<dyn PageFetcher>>,
        options: ExtractOptions,
    ) -> Self {
        Self {
            light,
            rendered,
            options,
        }
    }

    /// Returns the run configuration.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extracts one URL, retrying per the configured budget.
    pub async fn extract(&self, spec: &JobSpec) -> ExtractionResult {
        let mode = spec.mode.unwrap_or(self.options.mode);
        let retries = self.options.retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=retries {
            // Delay applies between attempts, never before the first.
            if attempt > 1 && !self.options.delay.is_zero() {
                let pause = self.options.delay.sample();
                debug!(url = %spec.url, delay_ms = pause.as_millis() as u64, "Delaying before retry");
                tokio::time::sleep(pause).await;
            }

            match self.attempt(&spec.url, mode).await {
                Ok(page) => {
                    let mut result = ExtractionResult::success(
                        &spec.url,
                        mode,
                        page.title,
                        page.body,
                        page.word_count,
                        attempt,
                    );
                    if self.options.summarize {
                        let summary = summary::summarize(&result.content, self.options.summary_words);
                        result = result.with_summary(summary);
                    }
                    return result;
                }
                Err(e) => {
                    warn!(url = %spec.url, attempt, retries, error = %e, "Extraction attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        ExtractionResult::failed(&spec.url, mode, last_error, retries)
    }

    async fn attempt(&self, url: &str, mode: ExtractionMode) -> Result<content::PageContent> {
        let html = match mode {
            ExtractionMode::Light => self.light.fetch(url).await?,
            ExtractionMode::Browser => self.fetch_rendered(url).await?,
            ExtractionMode::Deep => {
                debug!(url, "No deep-crawl backend configured, using browser rendering");
                self.fetch_rendered(url).await?
            }
        };
        content::extract_content(&html)
    }

    /// Rendered fetch with the documented degraded-mode policy: any missing
    /// or failing rendering backend falls back to the light fetcher.
    async fn fetch_rendered(&self, url: &str) -> Result<String> {
        match &self.rendered {
            Some(fetcher) => match fetcher.fetch(url).await {
                Ok(html) => Ok(html),
                Err(e) => {
                    warn!(url, error = %e, "Rendered fetch failed, falling back to light mode");
                    self.light.fetch(url).await
                }
            },
            None => {
                debug!(url, "No rendering backend available, using light mode");
                self.light.fetch(url).await
            }
        }
    }
}

#[cfg(feature = "headless")]
fn default_rendered_fetcher() -> Option<Arc<dyn PageFetcher>> {
    Some(Arc::new(crate::browser::BrowserFetcher::with_defaults()))
}

#[cfg(not(feature = "headless"))]
fn default_rendered_fetcher() -> Option<Arc<dyn PageFetcher>> {
    None
}
