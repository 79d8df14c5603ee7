use dashmap::DashSet;

/// Concurrent set of URLs claimed during a crawl session
///
/// A URL can be claimed exactly once. Claiming is a single add-if-absent on the
/// underlying set, so two tasks racing for the same URL can never both win.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    urls: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for the calling task
    ///
    /// # Returns
    ///
    /// * `true` - This call was the first to claim the URL
    /// * `false` - The URL had already been claimed
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Copies the claimed URLs out, in no particular order
    pub fn snapshot(&self) -> Vec<String> {
        self.urls.iter().map(|url| url.key().clone()).collect()
    }
}
