use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `data:` or `mailto:` URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_tally::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the robots.txt cache key for a URL: scheme and host, plus the port
/// when it is not the scheme's default
///
/// Appending `/robots.txt` to the key gives the location of the domain's
/// exclusion file.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_tally::url::domain_key;
///
/// let url = Url::parse("https://Example.com/a/b?c=d").unwrap();
/// assert_eq!(domain_key(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(domain_key(&url), Some("http://127.0.0.1:8080".to_string()));
/// ```
pub fn domain_key(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Some(format!("{}://{}{}", url.scheme(), host, port))
}
