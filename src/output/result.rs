//! The crawl result handed to writers

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Outcome of a crawl: the most popular words and how many URLs were visited
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Popular words with their counts, most popular first
    #[serde(serialize_with = "serialize_ordered")]
    pub word_counts: Vec<(String, u64)>,

    /// Number of distinct URLs the crawl claimed
    pub urls_visited: usize,
}

impl CrawlResult {
    /// Builds a result from raw word totals
    ///
    /// Words are ranked by count (descending), then by length (descending),
    /// then alphabetically. Only the top `popular_word_count` are kept; zero
    /// keeps them all.
    pub fn new(word_counts: HashMap<String, u64>, urls_visited: usize, popular_word_count: usize) -> Self {
        let mut ranked: Vec<(String, u64)> = word_counts.into_iter().collect();
        ranked.sort_by(compare_popularity);

        if popular_word_count > 0 {
            ranked.truncate(popular_word_count);
        }

        Self {
            word_counts: ranked,
            urls_visited,
        }
    }

    /// Count for a word if it made it into the result
    pub fn count_of(&self, word: &str) -> Option<u64> {
        self.word_counts
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, count)| *count)
    }
}

fn compare_popularity(a: &(String, u64), b: &(String, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.len().cmp(&a.0.len()))
        .then_with(|| a.0.cmp(&b.0))
}

/// Serializes ranked pairs as a JSON object, keeping their order
fn serialize_ordered<S>(pairs: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (word, count) in pairs {
        map.serialize_entry(word, count)?;
    }
    map.end()
}
