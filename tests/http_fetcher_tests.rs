//! Integration tests for the HTTP page fetcher
//!
//! These tests use wiremock to serve pages and robots.txt files and run full
//! crawls against the mock server.

use std::sync::Arc;
use std::time::Duration;
use web_tally::crawler::{run_crawl, CrawlSession, HttpPageFetcher, PageFetcher, SystemClock};
use web_tally::url::compile_patterns;
use web_tally::FetchError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_fetch_extracts_links_and_words() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title></head><body>
            <p>Tally the words, tally them all</p>
            <a href="{}/page1">Page</a>
            <a href="/page2">Page</a>
            </body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(Vec::new()).unwrap();
    let page = fetcher.fetch(&format!("{}/", base_url)).await.unwrap();

    assert_eq!(
        page.links,
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
    assert_eq!(page.word_counts.get("tally"), Some(&2));
    assert_eq!(page.word_counts.get("page"), Some(&2));
    assert_eq!(page.word_counts.get("home"), None);
}

#[tokio::test]
async fn test_fetch_applies_ignored_words() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body>a an the crawler</body></html>".to_string()))
        .mount(&mock_server)
        .await;

    let ignored = compile_patterns(&["^.{1,3}$".to_string()]).unwrap();
    let fetcher = HttpPageFetcher::new(ignored).unwrap();
    let page = fetcher.fetch(&format!("{}/", mock_server.uri())).await.unwrap();

    assert_eq!(page.word_counts.len(), 1);
    assert_eq!(page.word_counts.get("crawler"), Some(&1));
}

#[tokio::test]
async fn test_fetch_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(Vec::new()).unwrap();
    let result = fetcher.fetch(&format!("{}/missing", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_fetch_robots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Disallow: /private"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(Vec::new()).unwrap();
    let body = fetcher.fetch_robots(&mock_server.uri()).await.unwrap();

    assert_eq!(body, "Disallow: /private");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_against_server() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body>start
            <a href="{0}/page1">one</a>
            <a href="{0}/page2">two</a>
            <a href="{0}/private/hidden">hidden</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(format!(
            r#"<html><body>start again <a href="{}/page2">two</a></body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(format!(
            r#"<html><body>end <a href="{}/">home</a></body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/hidden"))
        .respond_with(html("<html><body>secret</body></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(Vec::new()).unwrap());
    let session = Arc::new(CrawlSession::new(
        fetcher,
        Arc::new(SystemClock),
        Vec::new(),
        Duration::from_secs(30),
        4,
    ));

    let totals = run_crawl(session, &[format!("{}/", base_url)], 3).await;

    assert_eq!(totals.urls_visited, 3);
    assert_eq!(totals.word_counts.get("start"), Some(&2));
    assert_eq!(totals.word_counts.get("two"), Some(&2));
    assert_eq!(totals.word_counts.get("end"), Some(&1));
    assert_eq!(totals.word_counts.get("secret"), None);
    // Mock expectations are verified when the server drops
}
