use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Web-Tally
///
/// Field names follow the camelCase keys of the JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed URLs the crawl starts from
    pub start_pages: Vec<String>,

    /// Patterns matched against the whole URL; matching URLs are never crawled
    #[serde(default)]
    pub ignored_urls: Vec<String>,

    /// Patterns matched against whole words; matching words are not counted
    #[serde(default)]
    pub ignored_words: Vec<String>,

    /// Number of worker threads used by the crawl
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Remaining depth handed to every seed page
    #[serde(default)]
    pub max_depth: u32,

    /// Seconds before the crawl deadline passes
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// How many of the most popular words end up in the result
    #[serde(default)]
    pub popular_word_count: usize,

    /// Where the profile report is appended (empty means stdout)
    #[serde(default)]
    pub profile_output_path: String,

    /// Where the JSON result is written (empty means stdout)
    #[serde(default)]
    pub result_path: String,
}

impl Config {
    /// The crawl timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_timeout_seconds() -> u64 {
    1
}
