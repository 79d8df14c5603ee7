//! State shared by every task of a crawl session
//!
//! # Components
//!
//! - `VisitedRegistry`: the set of URLs already claimed by some task
//! - `WordCountAggregator`: the running word-frequency totals

mod visited;
mod word_counts;

// Re-export main types
pub use visited::VisitedRegistry;
pub use word_counts::WordCountAggregator;
