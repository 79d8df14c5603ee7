//! Output module for crawl results and profile reports
//!
//! This module handles:
//! - Selecting the most popular words of a crawl
//! - Writing the crawl result as JSON
//! - Appending the profiler report

mod result;
mod writer;

pub use result::CrawlResult;
pub use writer::{write_profile, write_result};
