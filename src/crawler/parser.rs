//! HTML parser for extracting links and word counts
//!
//! # Link Extraction Rules
//!
//! **Include:** `<a href="...">` targets resolving to http(s) URLs, with the
//! fragment removed.
//!
//! **Exclude:** `javascript:`, `mailto:`, `tel:` and `data:` links,
//! fragment-only links, and `<a download>` links.
//!
//! # Word Counting Rules
//!
//! Text nodes under `<body>` (outside `<script>`, `<style>` and `<noscript>`)
//! are split on every non-alphanumeric character and lowercased. Words that
//! match an ignored-word pattern are dropped.

use crate::crawler::PageContents;
use crate::url::matches_any;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

const SKIPPED_TEXT_PARENTS: &[&str] = &["script", "style", "noscript"];

/// Parses HTML content into its outbound links and word counts
///
/// # Example
///
/// ```
/// use web_tally::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hello hello world</p><a href="/next">next</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_page(html, &base_url, &[]);
/// assert_eq!(page.links, vec!["https://example.com/next".to_string()]);
/// assert_eq!(page.word_counts.get("hello"), Some(&2));
/// ```
pub fn parse_page(html: &str, base_url: &Url, ignored_words: &[Regex]) -> PageContents {
    let document = Html::parse_document(html);

    PageContents {
        links: extract_links(&document, base_url),
        word_counts: count_words(&document, ignored_words),
    }
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}

/// Counts the words in the document body
fn count_words(document: &Html, ignored_words: &[Regex]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let Ok(body_selector) = Selector::parse("body") else {
        return counts;
    };

    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };

            let skipped = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|element| SKIPPED_TEXT_PARENTS.contains(&element.name()));
            if skipped {
                continue;
            }

            for word in text.split(|c: char| !c.is_alphanumeric()) {
                if word.is_empty() {
                    continue;
                }
                let word = word.to_lowercase();
                if matches_any(ignored_words, &word) {
                    continue;
                }
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    counts
}
