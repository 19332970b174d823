//! HTTP-based page fetcher using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::fetcher::PageFetcher;
use crate::Result;

/// Default request timeout for plain HTTP fetches, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// A page fetcher that uses plain HTTP requests via reqwest.
///
/// Suitable for pages that are server-rendered. For pages that require
/// JavaScript rendering, use `BrowserFetcher` instead. Non-2xx responses
/// are reported as errors so the retry layer can treat them as failures.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Creates an `HttpFetcher` with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (compatible; pagesift/0.3)")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_new() {
        let _fetcher = HttpFetcher::new();
    }

    #[test]
    fn test_http_fetcher_default() {
        let _fetcher = HttpFetcher::default();
    }

    #[test]
    fn test_http_fetcher_with_timeout() {
        let _fetcher = HttpFetcher::with_timeout(Duration::from_secs(5));
    }

    #[test]
    fn test_http_fetcher_with_client() {
        let client = Client::builder().user_agent("test-agent").build().unwrap();
        let _fetcher = HttpFetcher::with_client(client);
    }
}
