//! Per-session robots.txt cache
//!
//! Each domain gets one slot. The first task to need a domain's rules fetches
//! them while concurrent tasks for the same domain wait for that attempt and
//! share its outcome, so a single fetch serves every task queued behind it.
//! A failed attempt is remembered with its time: until the retry backoff has
//! elapsed, tasks treat the domain as unrestricted without fetching again.

use crate::crawler::PageFetcher;
use crate::robots::DisallowRules;
use crate::url::domain_key;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// How long a failed robots.txt fetch is trusted before it is tried again
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Rules and fetch bookkeeping for one domain
#[derive(Debug, Default)]
struct RulesSlot {
    rules: OnceCell<Arc<DisallowRules>>,
    /// Held for the whole of a fetch attempt; records when the last one failed
    last_failure: Mutex<Option<Instant>>,
}

/// Domain-keyed cache of disallowed path prefixes
#[derive(Debug)]
pub struct RobotsCache {
    domains: DashMap<String, Arc<RulesSlot>>,
    retry_backoff: Duration,
}

impl Default for RobotsCache {
    fn default() -> Self {
        Self::with_retry_backoff(DEFAULT_RETRY_BACKOFF)
    }
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that retries a failed domain once `retry_backoff` has passed
    pub fn with_retry_backoff(retry_backoff: Duration) -> Self {
        Self {
            domains: DashMap::new(),
            retry_backoff,
        }
    }

    /// Checks whether a URL's path is excluded by its domain's robots.txt
    ///
    /// Fetches and caches the domain's rules on first use. Unparseable URLs,
    /// URLs without a host, and domains whose robots.txt cannot be fetched are
    /// never excluded.
    pub async fn is_excluded(&self, url: &str, fetcher: &dyn PageFetcher) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Cannot check robots.txt for {}: {}", url, e);
                return false;
            }
        };

        let Some(domain) = domain_key(&parsed) else {
            return false;
        };

        match self.rules_for(&domain, fetcher).await {
            Some(rules) => rules.is_disallowed(parsed.path()),
            None => false,
        }
    }

    /// Returns the cached rules for a domain, fetching them when no recent attempt failed
    async fn rules_for(&self, domain: &str, fetcher: &dyn PageFetcher) -> Option<Arc<DisallowRules>> {
        // Clone the slot out so the map shard is not locked across the fetch
        let slot = Arc::clone(self.domains.entry(domain.to_string()).or_default().value());

        if let Some(rules) = slot.rules.get() {
            return Some(Arc::clone(rules));
        }

        let mut last_failure = slot.last_failure.lock().await;

        // Another task's attempt may have finished while this one waited
        if let Some(rules) = slot.rules.get() {
            return Some(Arc::clone(rules));
        }
        if let Some(failed_at) = *last_failure {
            if failed_at.elapsed() < self.retry_backoff {
                return None;
            }
        }

        tracing::debug!("Fetching robots.txt for {}", domain);
        match fetcher.fetch_robots(domain).await {
            Ok(content) => {
                let rules = Arc::new(DisallowRules::from_content(&content));
                let _ = slot.rules.set(Arc::clone(&rules));
                *last_failure = None;
                Some(rules)
            }
            Err(e) => {
                tracing::debug!("No robots.txt for {} ({}), nothing excluded", domain, e);
                *last_failure = Some(Instant::now());
                None
            }
        }
    }

    /// Returns the cached rules for a domain without fetching
    pub fn cached(&self, domain: &str) -> Option<Arc<DisallowRules>> {
        self.domains
            .get(domain)
            .and_then(|slot| slot.rules.get().map(Arc::clone))
    }

    /// Number of domains with successfully fetched rules
    pub fn cached_domains(&self) -> usize {
        self.domains
            .iter()
            .filter(|entry| entry.value().rules.initialized())
            .count()
    }
}
