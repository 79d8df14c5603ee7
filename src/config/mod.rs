//! Configuration module for Web-Tally
//!
//! This module handles loading, parsing, and validating JSON configuration files.
//!
//! # Example
//!
//! ```no_run
//! use web_tally::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.json")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::Config;

// Re-export parser functions
pub use parser::{load_config, read_config};
