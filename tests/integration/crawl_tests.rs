//! Integration tests for the worker crawl session
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, filter and record-writing cycle end-to-end.

use blub_crawler::blub1::{read_record, scan_corpus};
use blub_crawler::config::Config;
use blub_crawler::crawler::{crawl, DomainOutcome};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that writes under `data_dir` and crawls over plain http
fn create_test_config(data_dir: &Path, domain: &str) -> Config {
    let mut config = Config::default();
    config.domains = vec![domain.to_string()];
    config.output.data_dir = data_dir.to_string_lossy().into_owned();
    config.crawler.seed_scheme = "http".to_string();
    config.crawler.crawl_delay_ms = 1;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.name = "TestBot".to_string();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Host and port of the mock server, as a domain entry
fn domain_of(server: &MockServer) -> String {
    let uri = url::Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    format!(
        "{}:{}",
        uri.host_str().expect("Mock server URI has no host"),
        uri.port().expect("Mock server URI has no port")
    )
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let domain = domain_of(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/logo.png">Logo</a>
            <a href="http://elsewhere.invalid/">Elsewhere</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            "<html><head><title>Page 1</title></head><body>First page</body></html>".to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Blacklisted extensions never reach the network
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "image/png"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), &domain);

    let report = crawl(&config, &config.domains)
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.domains.len(), 1);
    assert_eq!(report.ids_claimed, 2);
    match &report.domains[0].1 {
        DomainOutcome::Crawled(crawl) => {
            assert_eq!(crawl.pages_visited, 2);
            assert!(crawl.urls_discarded >= 1);
            assert!(!crawl.hit_visit_limit);
        }
        DomainOutcome::Failed(e) => panic!("Domain should have been crawled: {}", e),
    }

    let host_dir = dir.path().join("127.0.0.1");
    let home = read_record(&host_dir.join("0.blub1")).expect("Failed to read record 0");
    assert_eq!(home.url(), format!("{}/", base_url));
    assert_eq!(home.title(), "Home");
    assert!(home.body().contains("Page 1"));

    let page1 = read_record(&host_dir.join("1.blub1")).expect("Failed to read record 1");
    assert_eq!(page1.url(), format!("{}/page1", base_url));
    assert_eq!(page1.title(), "Page 1");
    assert_eq!(page1.body(), "First page");

    assert!(!host_dir.join("2.blub1").exists());

    let summary = scan_corpus(dir.path()).expect("Failed to scan output");
    assert_eq!(summary.total_records(), 2);
    assert_eq!(summary.total_invalid(), 0);
}

#[tokio::test]
async fn test_visit_cap_limits_records() {
    let mock_server = MockServer::start().await;
    let domain = domain_of(&mock_server);

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            "<html><head><title>Index</title></head><body>{}</body></html>",
            links
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html(
            "<html><head><title>Leaf</title></head><body>leaf</body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(dir.path(), &domain);
    config.crawler.max_visits = 3;

    let report = crawl(&config, &config.domains)
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.ids_claimed, 3);
    match &report.domains[0].1 {
        DomainOutcome::Crawled(crawl) => {
            assert_eq!(crawl.pages_fetched, 3);
            assert!(crawl.hit_visit_limit);
        }
        DomainOutcome::Failed(e) => panic!("Domain should have been crawled: {}", e),
    }

    let summary = scan_corpus(dir.path()).expect("Failed to scan output");
    assert_eq!(summary.total_records(), 3);
}

#[tokio::test]
async fn test_ids_continue_across_domains() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html(
                "<html><head><title>Only</title></head><body>only page</body></html>".to_string(),
            ))
            .mount(server)
            .await;
    }

    let dir = TempDir::new().expect("Failed to create temp dir");
    let domains = vec![domain_of(&first), domain_of(&second)];
    let mut config = create_test_config(dir.path(), &domains[0]);
    config.domains = domains.clone();

    let report = crawl(&config, &domains)
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.ids_claimed, 2);
    assert_eq!(report.failed_domains().count(), 0);

    // Both mock servers share the 127.0.0.1 host directory and one counter
    let host_dir = dir.path().join("127.0.0.1");
    assert!(host_dir.join("0.blub1").is_file());
    assert!(host_dir.join("1.blub1").is_file());
}

#[tokio::test]
async fn test_unreachable_domain_is_skipped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><head><title>Up</title></head><body>up</body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let domains = vec!["127.0.0.1:9".to_string(), domain_of(&mock_server)];
    let config = create_test_config(dir.path(), &domains[0]);

    let report = crawl(&config, &domains)
        .await
        .expect("An unreachable domain should not abort the worker");

    let failed: Vec<_> = report.failed_domains().collect();
    assert_eq!(failed, vec!["127.0.0.1:9"]);
    assert_eq!(report.ids_claimed, 1);
    assert!(dir.path().join("127.0.0.1").join("0.blub1").is_file());
}
