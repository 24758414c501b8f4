//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from fetch to the JSON files on disk.

use sitescrape::config::Config;
use sitescrape::crawler::{FetchFailure, Fetcher, HttpFetcher};
use sitescrape::store::{JsonStore, Store};
use sitescrape::{run_crawl, CrawlRequest, PageOutcome};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Site key of every mock server (host 127.0.0.1)
const MOCK_SITE: &str = "127_0_0_1";

/// Creates a test configuration without politeness delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.politeness_delay_ms = 0;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.user_agent.contact_url = Some("https://example.com/contact".to_string());
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body).into_bytes(),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<h1>Welcome</h1>
            <p>Intro text</p>
            <ul><li>one</li><li>two</li></ul>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <img src="logo.png">"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/page1", r#"<h2>Page 1</h2><a href="/">home</a>"#).await;
    mount_page(&mock_server, "/page2", "<h3>Page 2</h3>").await;

    let request = CrawlRequest::new(vec![format!("{}/", base_url)], 1, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_stored, 3);
    assert_eq!(report.fetch_failures, 0);
    assert!(!report.cancelled);
    assert_eq!(
        report.completion_message(),
        "Scraping completed! Total pages scraped: 3"
    );

    let store = JsonStore::new(dir.path());
    assert_eq!(store.list_sites().unwrap(), vec![MOCK_SITE]);

    let aggregate = store.load(MOCK_SITE).unwrap();
    assert_eq!(
        aggregate.keys().collect::<Vec<_>>(),
        vec!["home", "page1", "page2"]
    );

    let home = &aggregate["home"];
    assert_eq!(home.headings, vec!["Welcome"]);
    assert_eq!(home.paragraphs, vec!["Intro text"]);
    assert_eq!(home.lists, vec!["one", "two"]);
    assert_eq!(home.links[0], "/page1");
    assert_eq!(home.images, vec!["logo.png"]);
    assert_eq!(aggregate["page2"].headings, vec!["Page 2"]);

    // Field names on disk
    let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", MOCK_SITE))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["home"]["Headings"][0], "Welcome");
    assert_eq!(value["home"]["Lists"][1], "two");
}

#[tokio::test]
async fn test_fetch_failure_is_contained() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">gone</a><a href="/broken">broken</a><a href="/ok">ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>fine</p>").await;
    // "/missing" is not mounted; wiremock answers 404

    let request = CrawlRequest::new(vec![format!("{}/", base_url)], 1, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.pages_stored, 2);
    assert_eq!(report.fetch_failures, 2);

    let failed: Vec<_> = report
        .outcomes
        .iter()
        .filter(|p| p.outcome == PageOutcome::FetchFailed)
        .map(|p| (p.url.clone(), p.error.clone().unwrap()))
        .collect();
    assert_eq!(
        failed,
        vec![
            (format!("{}/missing", base_url), "HTTP 404".to_string()),
            (format!("{}/broken", base_url), "HTTP 500".to_string()),
        ]
    );

    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(aggregate.keys().collect::<Vec<_>>(), vec!["home", "ok"]);
}

#[tokio::test]
async fn test_rerun_merges_into_existing_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/a", "<h1>A</h1>").await;
    mount_page(&mock_server, "/b", "<h1>B</h1>").await;

    let config = create_test_config();
    let first = CrawlRequest::new(vec![format!("{}/a", base_url)], 1, dir.path());
    run_crawl(&config, first, CancellationToken::new())
        .await
        .unwrap();

    let second = CrawlRequest::new(vec![format!("{}/b", base_url)], 1, dir.path());
    run_crawl(&config, second, CancellationToken::new())
        .await
        .unwrap();

    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(aggregate.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(aggregate["a"].headings, vec!["A"]);
    assert_eq!(aggregate["b"].headings, vec!["B"]);
}

#[tokio::test]
async fn test_relative_links_resolve_against_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/docs/guide/", r#"<a href="../api">api</a>"#).await;
    mount_page(&mock_server, "/docs/api", "<p>api</p>").await;

    let request = CrawlRequest::new(vec![format!("{}/docs/guide/", base_url)], 1, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_stored, 2);
    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(
        aggregate.keys().collect::<Vec<_>>(),
        vec!["docs_api", "docs_guide"]
    );
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let location = format!("{}/new", base_url);
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<h1>Moved</h1>").await;

    let request = CrawlRequest::new(vec![format!("{}/old", base_url)], 1, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_stored, 1);
    // Stored under the requested URL
    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(aggregate["old"].headings, vec!["Moved"]);
}

#[tokio::test]
async fn test_invalid_request_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(html("<p>x</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = CrawlRequest::new(vec![format!("{}/", mock_server.uri())], 2, dir.path());
    let err = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), sitescrape::ErrorKind::Configuration);
    assert!(!dir.path().join(format!("{}.json", MOCK_SITE)).exists());
}

#[tokio::test]
async fn test_invalid_seed_is_a_page_failure() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", "<h1>Root</h1>").await;

    let seeds = vec![format!("{}/", mock_server.uri()), "example.org".to_string()];
    let request = CrawlRequest::new(seeds, 2, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.fetch_failures, 1);
    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(aggregate["home"].headings, vec!["Root"]);
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html("<p>hi</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let url = Url::parse(&format!("{}/", mock_server.uri())).unwrap();

    let page = fetcher.fetch(&url).await.unwrap();
    assert_eq!(page.status_code, 200);
    assert_eq!(page.content_type, "text/html");
    assert!(page.body.contains("<p>hi</p>"));
}

#[tokio::test]
async fn test_http_fetcher_reports_final_url() {
    let mock_server = MockServer::start().await;

    let location = format!("{}/new", mock_server.uri());
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<p>here</p>").await;

    let config = create_test_config();
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let url = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();

    let page = fetcher.fetch(&url).await.unwrap();
    assert_eq!(page.final_url, location);
}

#[tokio::test]
async fn test_http_fetcher_status_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let url = Url::parse(&format!("{}/down", mock_server.uri())).unwrap();

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.reason, FetchFailure::Status(503));
    assert_eq!(err.url, url.as_str());
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.crawler.request_timeout_secs = 1;
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let url = Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.reason, FetchFailure::Timeout);
}

#[tokio::test]
async fn test_non_html_body_is_still_parsed() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"<h1>Plain</h1>".to_vec(), "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let request = CrawlRequest::new(vec![format!("{}/plain", mock_server.uri())], 1, dir.path());
    let report = run_crawl(&create_test_config(), request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_stored, 1);
    let aggregate = JsonStore::new(dir.path()).load(MOCK_SITE).unwrap();
    assert_eq!(aggregate["plain"].headings, vec!["Plain"]);
}
