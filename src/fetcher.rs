//! Page fetcher abstraction for retrieving raw page content.

use async_trait::async_trait;

use crate::Result;

/// Trait for fetching the raw content of a URL.
///
/// Implementations may use plain HTTP requests, a headless browser, or a
/// remote crawl service. All configuration (user-agent, timeouts) is set at
/// construction time; `fetch` is a simple URL-in, content-out interface.
/// Errors returned here are treated as transient by the retry layer.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the raw content of the given URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SiftError;

    struct FixedFetcher(&'static str);

    #[async_trait]
    impl PageFetcher for FixedFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenFetcher;

    #[async_trait]
    impl PageFetcher for BrokenFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(SiftError::Other(format!("no route to {}", url)))
        }
    }

    #[tokio::test]
    async fn test_fetcher_returns_content() {
        let fetcher = FixedFetcher("<html></html>");
        let html = fetcher.fetch("http://example.test").await.unwrap();
        assert_eq!(html, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetcher_propagates_errors() {
        let fetcher = BrokenFetcher;
        let err = fetcher.fetch("http://example.test").await.unwrap_err();
        assert!(err.to_string().contains("example.test"));
    }

    #[tokio::test]
    async fn test_fetcher_as_trait_object() {
        let fetcher: Box<dyn PageFetcher> = Box::new(FixedFetcher("x"));
        assert_eq!(fetcher.fetch("http://a.test").await.unwrap(), "x");
    }
}
