//! URL handling module for Web-Tally
//!
//! This module provides domain-key derivation for the robots.txt cache and
//! whole-string pattern matching for ignored URLs and words.

mod domain;
mod matcher;

// Re-export main functions
pub use domain::{domain_key, extract_domain};
pub use matcher::{compile_patterns, matches_any};
