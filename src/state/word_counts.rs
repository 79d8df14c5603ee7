use dashmap::DashMap;
use std::collections::HashMap;

/// Concurrent running totals of word frequencies
///
/// Each page's counts are added in per word. Only the shard holding the word
/// being updated is locked, and since addition commutes the totals do not
/// depend on the order pages arrive in.
#[derive(Debug, Default)]
pub struct WordCountAggregator {
    counts: DashMap<String, u64>,
}

impl WordCountAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one page's word counts into the totals
    pub fn merge(&self, page_counts: &HashMap<String, u64>) {
        for (word, count) in page_counts {
            *self.counts.entry(word.clone()).or_insert(0) += *count;
        }
    }

    /// Current total for a single word
    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).map(|count| *count)
    }

    /// Number of distinct words seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copies the current totals out
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_merge_adds() {
        let aggregator = WordCountAggregator::new();
        aggregator.merge(&counts(&[("rust", 2), ("crab", 1)]));
        aggregator.merge(&counts(&[("rust", 3), ("ferris", 4)]));

        assert_eq!(aggregator.get("rust"), Some(5));
        assert_eq!(aggregator.get("crab"), Some(1));
        assert_eq!(aggregator.get("ferris"), Some(4));
        assert_eq!(aggregator.get("missing"), None);
        assert_eq!(aggregator.len(), 3);
    }

    #[test]
    fn test_merge_empty_page() {
        let aggregator = WordCountAggregator::new();
        aggregator.merge(&HashMap::new());
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_snapshot_matches_totals() {
        let aggregator = WordCountAggregator::new();
        aggregator.merge(&counts(&[("a", 1), ("b", 2)]));
        assert_eq!(aggregator.snapshot(), counts(&[("a", 1), ("b", 2)]));
    }

    #[test]
    fn test_concurrent_merges_lose_nothing() {
        let aggregator = Arc::new(WordCountAggregator::new());
        let page = counts(&[("shared", 1), ("other", 2)]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aggregator = Arc::clone(&aggregator);
                let page = page.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        aggregator.merge(&page);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(aggregator.get("shared"), Some(2000));
        assert_eq!(aggregator.get("other"), Some(4000));
    }
}
