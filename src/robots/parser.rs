//! Robots.txt parser implementation
//!
//! Only `Disallow:` directives are honored, for every user agent alike.

use std::collections::HashSet;

const DISALLOW_DIRECTIVE: &str = "Disallow:";

/// Disallowed path prefixes for a single domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisallowRules {
    prefixes: HashSet<String>,
}

impl DisallowRules {
    /// Creates rules from raw robots.txt content
    ///
    /// Every line that starts with `Disallow:` (after trimming) contributes the
    /// remainder of the line, trimmed, as a prefix. Empty remainders are dropped,
    /// since `Disallow:` with no value excludes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use web_tally::robots::DisallowRules;
    ///
    /// let rules = DisallowRules::from_content("User-agent: *\nDisallow: /private\n");
    /// assert!(rules.is_disallowed("/private/page"));
    /// assert!(!rules.is_disallowed("/public"));
    /// ```
    pub fn from_content(content: &str) -> Self {
        let prefixes = content
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix(DISALLOW_DIRECTIVE))
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
            .collect();

        Self { prefixes }
    }

    /// Rules that exclude nothing
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks whether a URL path starts with any disallowed prefix
    pub fn is_disallowed(&self, path: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Number of distinct disallowed prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
