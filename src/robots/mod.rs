//! Robots.txt handling module
//!
//! This module parses the `Disallow:` lines of robots.txt files and keeps a
//! per-session cache of them, keyed by domain. The cache lives exactly as long
//! as the crawl session that owns it.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::DisallowRules;
