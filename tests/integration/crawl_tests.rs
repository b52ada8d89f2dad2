//! Integration tests for the crawler
//!
//! These tests use wiremock servers standing in for both the forward proxy
//! and the code-hosting site. A plain-HTTP target is fetched through the
//! proxy in absolute form, so one mock server can play both roles.

use repo_scout::config::{CrawlInput, CrawlerSettings, ProxyCredentials, ProxyEndpoint, SearchType};
use repo_scout::crawler::{
    crawl, FetchOutcome, HttpFetcher, PageSource, ProxySelector, RepoRecord, USER_AGENT,
};
use repo_scout::ConfigError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// "alice:s3cret" in basic auth form
const PROXY_AUTHORIZATION: &str = "Basic YWxpY2U6czNjcmV0";

fn credentials() -> ProxyCredentials {
    ProxyCredentials::new("alice", "s3cret")
}

/// Returns the "host:port" of a mock server, for use as a proxy
fn proxy_address(server: &MockServer) -> String {
    server.address().to_string()
}

fn endpoint(server: &MockServer) -> ProxyEndpoint {
    proxy_address(server).parse().expect("mock address is host:port")
}

fn settings(server: &MockServer) -> CrawlerSettings {
    CrawlerSettings {
        concurrency: 4,
        timeout: Duration::from_secs(5),
        origin: server.uri(),
    }
}

fn search_result(href: &str) -> String {
    format!(
        r#"<div class="Box-sc-g0xbh4-0 MHoGG search-title">
            <a class="Link__StyledLink-sc-14289xe-0" href="{}"><span>{}</span></a>
        </div>"#,
        href, href
    )
}

fn search_page(hrefs: &[&str]) -> String {
    let results: Vec<String> = hrefs.iter().map(|h| search_result(h)).collect();
    format!(
        "<html><body><div data-testid=\"results-list\">{}</div></body></html>",
        results.join("\n")
    )
}

fn repo_page_alice() -> String {
    r#"<html><body>
        <span class="author flex-self-stretch" itemprop="author">
            <a class="url fn" rel="author" data-hovercard-type="user" href="/alice">
                alice
            </a>
        </span>
        <div class="BorderGrid-cell">
            <h2 class="h4 mb-3">Languages</h2>
            <ul class="list-style-none">
                <li class="d-inline">
                    <a class="d-inline-flex flex-items-center flex-nowrap Link--secondary no-underline text-small mr-3" href="/a/b/search?l=go">
                        <svg class="octicon octicon-dot-fill mr-2" aria-hidden="true"></svg>
                        <span class="color-fg-default text-bold mr-1">Go</span>
                        <span>80.0%</span>
                    </a>
                </li>
                <li class="d-inline">
                    <span class="d-inline-flex flex-items-center flex-nowrap text-small mr-3">
                        <svg class="octicon octicon-dot-fill mr-2" aria-hidden="true"></svg>
                        <span class="color-fg-default text-bold mr-1">Other</span>
                        <span>20.0%</span>
                    </span>
                </li>
            </ul>
        </div>
    </body></html>"#
        .to_string()
}

fn repo_page_empty() -> String {
    r#"<html><body><h1>c/d</h1><p>No description.</p></body></html>"#.to_string()
}

/// Mounts the search page for `keyword`, served only with proxy credentials
async fn mount_search(server: &MockServer, keyword: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", keyword))
        .and(query_param("type", "Repositories"))
        .and(header("proxy-authorization", PROXY_AUTHORIZATION))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .and(header("proxy-authorization", PROXY_AUTHORIZATION))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_single_keyword() {
    let server = MockServer::start().await;

    mount_search(
        &server,
        "raft",
        ResponseTemplate::new(200).set_body_string(search_page(&["/a/b", "/a/b", "/c/d"])),
    )
    .await;
    mount_page(&server, "/a/b", repo_page_alice(), 1).await;
    mount_page(&server, "/c/d", repo_page_empty(), 1).await;

    let input = CrawlInput {
        keywords: vec!["raft".to_string()],
        proxies: vec![proxy_address(&server)],
        search_type: SearchType::Repositories,
    };

    let report = crawl(&input, &credentials(), &settings(&server))
        .await
        .expect("crawl should complete");

    let languages: BTreeMap<String, String> = [("Go", "80.0"), ("Other", "20.0")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let expected = serde_json::json!([
        {
            "url": format!("{}/a/b", server.uri()),
            "extra": {"owner": "alice", "language_stats": languages}
        },
        {
            "url": format!("{}/c/d", server.uri()),
            "extra": {"owner": "Not found", "language_stats": {}}
        }
    ]);

    assert_eq!(serde_json::to_value(&report.records).unwrap(), expected);
    assert_eq!(report.stats.links_discovered, 2);
    assert_eq!(report.stats.repos_enriched, 2);
}

#[tokio::test]
async fn test_dedup_across_keywords() {
    let server = MockServer::start().await;

    mount_search(
        &server,
        "raft",
        ResponseTemplate::new(200).set_body_string(search_page(&["/a/b"])),
    )
    .await;
    mount_search(
        &server,
        "consensus",
        ResponseTemplate::new(200).set_body_string(search_page(&["/a/b", "/c/d"])),
    )
    .await;
    // Each repository page must be requested exactly once
    mount_page(&server, "/a/b", repo_page_alice(), 1).await;
    mount_page(&server, "/c/d", repo_page_empty(), 1).await;

    let input = CrawlInput {
        keywords: vec!["raft".to_string(), "consensus".to_string()],
        proxies: vec![proxy_address(&server)],
        search_type: SearchType::Repositories,
    };

    let report = crawl(&input, &credentials(), &settings(&server)).await.unwrap();

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/a/b", server.uri()),
            format!("{}/c/d", server.uri())
        ]
    );
}

#[tokio::test]
async fn test_failed_search_pages_are_tolerated() {
    let server = MockServer::start().await;

    mount_search(&server, "raft", ResponseTemplate::new(500)).await;
    mount_search(
        &server,
        "paxos",
        ResponseTemplate::new(200).set_body_string(search_page(&["/c/d", "https://evil.example/x/y"])),
    )
    .await;
    mount_page(&server, "/c/d", repo_page_empty(), 1).await;

    let input = CrawlInput {
        keywords: vec!["raft".to_string(), "paxos".to_string()],
        proxies: vec![proxy_address(&server)],
        search_type: SearchType::Repositories,
    };

    let report = crawl(&input, &credentials(), &settings(&server)).await.unwrap();

    assert_eq!(report.stats.search_pages_failed, 1);
    assert_eq!(report.stats.links_rejected, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].owner(), "Not found");
    assert!(report.records[0].language_stats().is_empty());
}

#[tokio::test]
async fn test_failed_repository_contributes_nothing() {
    let server = MockServer::start().await;

    mount_search(
        &server,
        "raft",
        ResponseTemplate::new(200).set_body_string(search_page(&["/a/b", "/gone/repo"])),
    )
    .await;
    mount_page(&server, "/a/b", repo_page_alice(), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone/repo"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let input = CrawlInput {
        keywords: vec!["raft".to_string()],
        proxies: vec![proxy_address(&server)],
        search_type: SearchType::Repositories,
    };

    let report = crawl(&input, &credentials(), &settings(&server)).await.unwrap();

    let records: Vec<&RepoRecord> = report.records.iter().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner(), "alice");
    assert_eq!(report.stats.repos_failed, 1);
}

#[tokio::test]
async fn test_fetch_classifies_http_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(vec![endpoint(&server)], &credentials(), Duration::from_secs(5)).unwrap();
    let url = format!("{}/a/b", server.uri());
    let result = fetcher.fetch(&url).await;

    assert_eq!(result.url, url);
    assert_eq!(result.outcome, FetchOutcome::HttpError(503));
}

#[tokio::test]
async fn test_fetch_returns_body_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(vec![endpoint(&server)], &credentials(), Duration::from_secs(5)).unwrap();
    let result = fetcher.fetch(&format!("{}/a/b", server.uri())).await;

    assert_eq!(result.outcome, FetchOutcome::Ok("<html>ok</html>".to_string()));

    // The header matcher splits values on commas, so compare the rejoined value
    let requests = server.received_requests().await.expect("request recording is on");
    assert_eq!(requests.len(), 1);
    let user_agent = requests[0]
        .headers
        .iter()
        .find(|(name, _)| name.as_str().eq_ignore_ascii_case("user-agent"))
        .map(|(_, values)| {
            values
                .iter()
                .map(|value| value.as_str().trim())
                .collect::<Vec<_>>()
                .join(", ")
        });
    assert_eq!(user_agent.as_deref(), Some(USER_AGENT));
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher =
        HttpFetcher::new(vec![endpoint(&server)], &credentials(), Duration::from_millis(200)).unwrap();
    let result = fetcher.fetch(&format!("{}/slow", server.uri())).await;

    assert!(
        matches!(result.outcome, FetchOutcome::TransportError(_)),
        "unexpected outcome: {:?}",
        result.outcome
    );
}

#[tokio::test]
async fn test_unreachable_proxy_is_transport_error() {
    // Reserve a port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dead: ProxyEndpoint = format!("127.0.0.1:{}", port).parse().unwrap();
    let fetcher = HttpFetcher::new(vec![dead], &credentials(), Duration::from_secs(2)).unwrap();
    let result = fetcher.fetch("http://example.invalid/a/b").await;

    assert!(matches!(result.outcome, FetchOutcome::TransportError(_)));
}

/// Cycles through a fixed list of indices
struct SequenceSelector {
    order: Vec<usize>,
    cursor: AtomicUsize,
}

impl ProxySelector for SequenceSelector {
    fn select<'a, T>(&self, candidates: &'a [T]) -> Result<&'a T, ConfigError> {
        let step = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = self.order[step % self.order.len()];
        candidates.get(index).ok_or(ConfigError::NoProxies)
    }
}

#[tokio::test]
async fn test_requests_follow_the_selected_proxy() {
    let origin = MockServer::start().await;
    let first_proxy = MockServer::start().await;
    let second_proxy = MockServer::start().await;

    for (proxy, hits) in [(&first_proxy, 1u64), (&second_proxy, 2u64)] {
        Mock::given(method("GET"))
            .and(path("/a/b"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(hits)
            .mount(proxy)
            .await;
    }

    let selector = SequenceSelector {
        order: vec![1, 0, 1],
        cursor: AtomicUsize::new(0),
    };
    let fetcher = HttpFetcher::with_selector(
        vec![endpoint(&first_proxy), endpoint(&second_proxy)],
        &credentials(),
        Duration::from_secs(5),
        selector,
    )
    .unwrap();

    // The origin itself is never contacted; the proxies answer
    let url = format!("{}/a/b", origin.uri());
    for _ in 0..3 {
        assert!(fetcher.fetch(&url).await.is_ok());
    }
}
