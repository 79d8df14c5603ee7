//! The recursive unit of crawl work

use crate::crawler::CrawlSession;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::task::JoinSet;

/// One URL at one remaining depth, within a shared session
#[derive(Clone)]
pub struct CrawlTask {
    url: String,
    remaining_depth: u32,
    session: Arc<CrawlSession>,
}

impl CrawlTask {
    pub fn new(url: String, remaining_depth: u32, session: Arc<CrawlSession>) -> Self {
        Self {
            url,
            remaining_depth,
            session,
        }
    }

    /// Crawls this URL and, recursively, every link it leads to
    ///
    /// # Flow
    ///
    /// 1. Skip (no side effects) when depth is exhausted, the deadline has
    ///    passed, the URL is ignored, or robots.txt excludes it
    /// 2. Claim the URL in the visited registry; skip if already claimed
    /// 3. Fetch the page; a failure is logged and prunes this subtree only
    /// 4. Merge the page's word counts into the session totals
    /// 5. Fork one child per link at depth - 1 and wait for all of them
    ///
    /// # Returns
    ///
    /// * `true` - This URL was fetched and parsed
    /// * `false` - It was skipped, already claimed, or failed
    pub fn run(self) -> BoxFuture<'static, bool> {
        async move {
            let session = &self.session;

            if self.remaining_depth == 0 {
                tracing::trace!("Depth exhausted at {}", self.url);
                return false;
            }

            if session.deadline_passed() {
                tracing::trace!("Deadline passed, not crawling {}", self.url);
                return false;
            }

            if session.is_ignored(&self.url) {
                tracing::debug!("Ignoring {}", self.url);
                return false;
            }

            if session.robots.is_excluded(&self.url, session.fetcher()).await {
                tracing::debug!("URL {} disallowed by robots.txt", self.url);
                return false;
            }

            if !session.visited.claim(&self.url) {
                tracing::trace!("Already visited {}", self.url);
                return false;
            }

            let page = {
                let _permit = session.fetch_permit().await;
                session.fetcher().fetch(&self.url).await
            };

            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Failed to crawl {}: {}", self.url, e);
                    return false;
                }
            };

            session.word_counts.merge(&page.word_counts);

            tracing::debug!(
                "Crawled {} at depth {}: {} link(s), {} distinct word(s)",
                self.url,
                self.remaining_depth,
                page.links.len(),
                page.word_counts.len()
            );

            let mut children = JoinSet::new();
            for link in page.links {
                let child = CrawlTask::new(link, self.remaining_depth - 1, Arc::clone(session));
                children.spawn(child.run());
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("Crawl task under {} failed: {}", self.url, e);
                }
            }

            true
        }
        .boxed()
    }
}
