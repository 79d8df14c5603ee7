//! Shared state of a single crawl invocation

use crate::crawler::task::CrawlTask;
use crate::crawler::{Clock, PageFetcher};
use crate::robots::RobotsCache;
use crate::state::{VisitedRegistry, WordCountAggregator};
use crate::url::matches_any;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::task::JoinSet;

/// Everything the tasks of one crawl share
///
/// Built once before the first task starts and read back after the last one
/// finishes. Nothing is ever removed from the registry, the aggregator or the
/// robots cache while the session is alive.
pub struct CrawlSession {
    deadline: Instant,
    clock: Arc<dyn Clock>,
    fetcher: Arc<dyn PageFetcher>,
    ignored_urls: Vec<Regex>,
    fetch_permits: Semaphore,
    pub(crate) word_counts: WordCountAggregator,
    pub(crate) visited: VisitedRegistry,
    pub(crate) robots: RobotsCache,
}

impl CrawlSession {
    /// Creates a session whose deadline is `timeout` from the clock's current instant
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The page fetch capability
    /// * `clock` - Time source for the deadline
    /// * `ignored_urls` - Compiled whole-URL patterns that are never crawled
    /// * `timeout` - How long the crawl may keep starting new pages
    /// * `max_concurrent_fetches` - Upper bound on page fetches in flight (at least 1)
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        clock: Arc<dyn Clock>,
        ignored_urls: Vec<Regex>,
        timeout: Duration,
        max_concurrent_fetches: usize,
    ) -> Self {
        let deadline = clock.now() + timeout;

        Self {
            deadline,
            clock,
            fetcher,
            ignored_urls,
            fetch_permits: Semaphore::new(max_concurrent_fetches.max(1)),
            word_counts: WordCountAggregator::new(),
            visited: VisitedRegistry::new(),
            robots: RobotsCache::new(),
        }
    }

    /// True once the clock reaches the deadline
    pub fn deadline_passed(&self) -> bool {
        self.clock.now() >= self.deadline
    }

    pub fn is_ignored(&self, url: &str) -> bool {
        matches_any(&self.ignored_urls, url)
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }

    /// Waits for a free page-fetch slot
    pub(crate) async fn fetch_permit(&self) -> Option<SemaphorePermit<'_>> {
        self.fetch_permits.acquire().await.ok()
    }
}

/// Word totals and visit count read back from a finished session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlTotals {
    pub word_counts: HashMap<String, u64>,
    pub urls_visited: usize,
}

/// Crawls every seed to `max_depth` within the session and collects the totals
///
/// One task is started per seed; this returns only after every task, and
/// every task those tasks forked, has finished or been pruned.
pub async fn run_crawl(session: Arc<CrawlSession>, seeds: &[String], max_depth: u32) -> CrawlTotals {
    tracing::info!(
        "Starting crawl of {} seed(s) to depth {}",
        seeds.len(),
        max_depth
    );

    let mut tasks = JoinSet::new();
    for seed in seeds {
        let task = CrawlTask::new(seed.clone(), max_depth, Arc::clone(&session));
        tasks.spawn(task.run());
    }

    let mut parsed_seeds = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => parsed_seeds += 1,
            Ok(false) => {}
            Err(e) => tracing::error!("Seed task failed: {}", e),
        }
    }

    let totals = CrawlTotals {
        word_counts: session.word_counts.snapshot(),
        urls_visited: session.visited.len(),
    };

    tracing::info!(
        "Crawl finished: {} of {} seed(s) parsed, {} URL(s) visited, {} distinct word(s)",
        parsed_seeds,
        seeds.len(),
        totals.urls_visited,
        totals.word_counts.len()
    );

    totals
}
