use crate::ConfigError;
use regex::Regex;

/// Compiles configuration patterns into whole-string matchers
///
/// Each pattern is anchored at both ends, so `http://example\.com/.*` matches
/// every URL under that site but `example` alone matches nothing except the
/// literal word "example".
///
/// # Returns
///
/// * `Ok(Vec<Regex>)` - One compiled matcher per pattern, in order
/// * `Err(ConfigError::InvalidPattern)` - A pattern failed to compile
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern))
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
        })
        .collect()
}

/// Checks whether any of the compiled patterns matches the candidate
///
/// # Examples
///
/// ```
/// use web_tally::url::{compile_patterns, matches_any};
///
/// let patterns = compile_patterns(&["http://example\\.com/private/.*".to_string()]).unwrap();
/// assert!(matches_any(&patterns, "http://example.com/private/a"));
/// assert!(!matches_any(&patterns, "http://example.com/public"));
/// ```
pub fn matches_any(patterns: &[Regex], candidate: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(candidate))
}
