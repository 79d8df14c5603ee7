//! Crawler module for parallel page fetching and word counting
//!
//! This module contains the core crawling logic, including:
//! - The page fetch capability and its HTTP implementation
//! - HTML parsing into links and word counts
//! - The recursive fork/join crawl task and its shared session
//! - The `ParallelCrawler` front end that turns a config into a result

mod clock;
mod fetcher;
mod parser;
mod session;
mod task;

pub use clock::{Clock, FakeClock, SystemClock};
pub use fetcher::{build_http_client, HttpPageFetcher, PageContents, PageFetcher};
pub use parser::parse_page;
pub use session::{run_crawl, CrawlSession, CrawlTotals};
pub use task::CrawlTask;

use crate::config::Config;
use crate::output::CrawlResult;
use crate::profiler::ProfiledTarget;
use crate::url::compile_patterns;
use crate::ConfigError;
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Capability to run a whole crawl from a set of seed pages
pub trait Crawl: Send + Sync {
    fn crawl<'a>(&'a self, seeds: &'a [String]) -> BoxFuture<'a, CrawlResult>;
}

/// Crawls seed pages in parallel and reports the most popular words
pub struct ParallelCrawler {
    fetcher: Arc<dyn PageFetcher>,
    clock: Arc<dyn Clock>,
    ignored_urls: Vec<Regex>,
    max_depth: u32,
    timeout: Duration,
    parallelism: usize,
    popular_word_count: usize,
}

impl ParallelCrawler {
    /// Creates a crawler from a loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ParallelCrawler)` - Ready to crawl
    /// * `Err(ConfigError::InvalidPattern)` - An ignored-URL pattern does not compile
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            clock,
            ignored_urls: compile_patterns(&config.ignored_urls)?,
            max_depth: config.max_depth,
            timeout: config.timeout(),
            parallelism: config.parallelism,
            popular_word_count: config.popular_word_count,
        })
    }

    /// Runs one crawl session from the given seeds
    async fn crawl_session(&self, seeds: &[String]) -> CrawlResult {
        let session = Arc::new(CrawlSession::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.clock),
            self.ignored_urls.clone(),
            self.timeout,
            self.parallelism,
        ));

        let totals = run_crawl(session, seeds, self.max_depth).await;

        CrawlResult::new(totals.word_counts, totals.urls_visited, self.popular_word_count)
    }
}

impl Crawl for ParallelCrawler {
    fn crawl<'a>(&'a self, seeds: &'a [String]) -> BoxFuture<'a, CrawlResult> {
        self.crawl_session(seeds).boxed()
    }
}

impl ProfiledTarget for ParallelCrawler {
    const PROFILED_OPERATIONS: &'static [&'static str] = &["crawl"];
}
