//! Page fetch capability and its HTTP implementation
//!
//! The crawl only ever sees the `PageFetcher` trait: hand it a URL and get
//! back the page's outbound links and word counts, or a `FetchError`.
//! `HttpPageFetcher` is the real network-backed implementation.

use crate::crawler::parser::parse_page;
use crate::profiler::ProfiledTarget;
use crate::FetchError;
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// What a single successfully parsed page contributes to the crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContents {
    /// Absolute URLs of outbound links, in document order
    pub links: Vec<String>,

    /// Occurrences of each counted word on the page
    pub word_counts: HashMap<String, u64>,
}

/// Capability to fetch pages and robots.txt files
///
/// Implementations must be shareable across worker threads. Failures are
/// returned, never panicked.
pub trait PageFetcher: Send + Sync {
    /// Fetches and parses a single page
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContents, FetchError>>;

    /// Fetches the raw robots.txt body for a domain key such as `https://example.com`
    fn fetch_robots<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// Builds the HTTP client used for page and robots.txt requests
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and extracts links and words from their HTML
pub struct HttpPageFetcher {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HttpPageFetcher {
    /// Creates a fetcher that skips words matching any of `ignored_words`
    pub fn new(ignored_words: Vec<Regex>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?, ignored_words))
    }

    pub fn with_client(client: Client, ignored_words: Vec<Regex>) -> Self {
        Self {
            client,
            ignored_words,
        }
    }

    /// GETs a URL and returns its body, treating non-2xx statuses as errors
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<PageContents, FetchError> {
        let base_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let body = self.get_text(url).await?;

        Ok(parse_page(&body, &base_url, &self.ignored_words))
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContents, FetchError>> {
        self.fetch_page(url).boxed()
    }

    fn fetch_robots<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        async move { self.get_text(&format!("{}/robots.txt", domain)).await }.boxed()
    }
}

impl ProfiledTarget for HttpPageFetcher {
    const PROFILED_OPERATIONS: &'static [&'static str] = &["fetch"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_new_fetcher() {
        assert!(HttpPageFetcher::new(Vec::new()).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_error() {
        let fetcher = HttpPageFetcher::new(Vec::new()).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    // Network round trips are covered with wiremock in tests/http_fetcher_tests.rs
}
