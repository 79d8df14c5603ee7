//! Web-Tally: a parallel, deadline-bounded word-counting web crawler
//!
//! This crate crawls outward from a set of seed pages, respecting robots.txt
//! exclusions and ignore patterns, and tallies word frequencies across every
//! page it manages to parse. A small call profiler can wrap any component to
//! record how long its designated operations take.

pub mod config;
pub mod crawler;
pub mod output;
pub mod profiler;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Web-Tally operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Profiler error: {0}")]
    Profiler(#[from] ProfilerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Failure side of a single page or robots.txt fetch
///
/// These never abort a crawl. A failed page prunes its own subtree and a
/// failed robots.txt fetch means nothing is excluded for that domain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Misuse of the call profiler
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfilerError {
    #[error("Negative elapsed time recorded for {key}")]
    NegativeElapsed { key: String },

    #[error("{type_name} has no profiled operations")]
    NoProfiledOperations { type_name: &'static str },
}

/// Result type alias for Web-Tally operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Crawl, CrawlSession, PageFetcher, ParallelCrawler};
pub use output::CrawlResult;
pub use profiler::{Profiled, ProfiledTarget, Profiler};
