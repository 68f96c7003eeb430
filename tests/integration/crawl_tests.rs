//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and abstract pages and drive the
//! real HTTP fetcher through a complete snapshot run.

use arxiv_snapshot::config::{Config, ListingConfig, OutputConfig, UserAgentConfig};
use arxiv_snapshot::crawler::{crawl, FetchFailure, StopReason};
use arxiv_snapshot::output::write_snapshot;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/list/cs.RO/recent";

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, page_size: u32) -> Config {
    Config {
        listing: ListingConfig {
            base_url: format!("{}{}", server.uri(), LISTING_PATH),
            category_label: "Test Robotics".to_string(),
            page_size,
            max_pages: 10,
            request_delay_ms: 0, // No pacing in tests
            fetch_abstracts: false,
            abstract_base_url: format!("{}/abs/", server.uri()),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
            contact_email: Some("test@example.com".to_string()),
        },
        output: OutputConfig::default(),
    }
}

/// One listing entry in arXiv's markup
fn entry(id: &str, title: &str, authors: &[&str]) -> String {
    let authors = authors
        .iter()
        .map(|name| format!(r#"<a href="/a/{}_1">{}</a>"#, name.replace(' ', "_"), name))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        r#"<dt><a name="item"></a>
  <a href="/abs/{id}" title="Abstract" id="{id}">arXiv:{id}</a>
  [<a href="/pdf/{id}" title="Download PDF">pdf</a>]
</dt>
<dd>
  <div class="meta">
    <div class="list-title mathjax"><span class="descriptor">Title:</span>
      {title}
    </div>
    <div class="list-authors">{authors}</div>
  </div>
</dd>"#
    )
}

/// A listing page holding `count` entries numbered from `first`
fn listing_page(first: usize, count: usize) -> String {
    let entries: String = (first..first + count)
        .map(|n| entry(&format!("2401.{:05}", n), &format!("Paper {}", n), &["A. Author"]))
        .collect();
    format!(
        "<html><body><div id=\"dlpage\"><dl id=\"articles\">{}</dl></div></body></html>",
        entries
    )
}

async fn mount_page(server: &MockServer, skip: u32, show: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("skip", skip.to_string()))
        .and(query_param("show", show.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_pages_until_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 5, listing_page(1, 5)).await;
    mount_page(&server, 5, 5, listing_page(6, 5)).await;
    mount_page(&server, 10, 5, listing_page(11, 2)).await;

    let config = create_test_config(&server, 5);
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 12);
    assert_eq!(outcome.entries_skipped, 0);

    let ids: Vec<String> = outcome.records.iter().map(|r| r.id().to_string()).collect();
    let expected: Vec<String> = (1..=12).map(|n| format!("2401.{:05}", n)).collect();
    assert_eq!(ids, expected);

    assert_eq!(outcome.records[0].title(), "Paper 1");
    assert_eq!(outcome.records[0].authors(), ["A. Author".to_string()]);
}

#[tokio::test]
async fn test_server_error_keeps_partial_records() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 5, listing_page(1, 5)).await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("skip", "5"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 5);
    let outcome = crawl(&config).await.unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 5);

    match outcome.failure() {
        Some(FetchFailure::Status { url, status }) => {
            assert_eq!(*status, 500);
            assert!(url.contains("skip=5"));
        }
        other => panic!("Expected a status failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_first_page_ends_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        5,
        "<html><body><p>No updates today.</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&server, 5);
    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(outcome.pages_fetched, 1);
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_page_limit_stops_full_listing() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 2, listing_page(1, 2)).await;
    mount_page(&server, 2, 2, listing_page(3, 2)).await;

    let mut config = create_test_config(&server, 2);
    config.listing.max_pages = 2;

    let outcome = crawl(&config).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 4);
}

#[tokio::test]
async fn test_listing_requests_are_paced() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 2, listing_page(1, 2)).await;
    mount_page(&server, 2, 2, listing_page(3, 2)).await;
    mount_page(&server, 4, 2, listing_page(5, 1)).await;

    let mut config = create_test_config(&server, 2);
    config.listing.request_delay_ms = 50;

    let started = std::time::Instant::now();
    let outcome = crawl(&config).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 5);
    // Three requests, two gaps
    assert!(
        elapsed >= std::time::Duration::from_millis(100),
        "three pages took only {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_listing_abstracts_and_links_skip_extra_requests() {
    let server = MockServer::start().await;
    let page = r#"<html><body><dl>
<dt><a href="/abs/2401.00001">arXiv:2401.00001</a>
  [<a href="/html/2401.00001v1" title="View HTML">html</a>]</dt>
<dd><div class="meta">
  <div class="list-title"><span class="descriptor">Title:</span> Listed Abstract</div>
  <div class="list-abstract"><span class="descriptor">Abstract:</span> Already here.</div>
</div></dd>
</dl></body></html>"#
        .to_string();
    mount_page(&server, 0, 5, page).await;

    Mock::given(method("GET"))
        .and(path("/abs/2401.00001"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 5);
    config.listing.fetch_abstracts = true;

    let outcome = crawl(&config).await.unwrap();

    let record = &outcome.records[0];
    assert_eq!(record.abstract_text(), Some("Already here."));
    assert_eq!(
        record.html_link().map(str::to_string),
        Some(format!("{}/html/2401.00001v1", server.uri()))
    );
    assert_eq!(outcome.abstracts_missing, 0);
}

#[tokio::test]
async fn test_requests_identify_crawler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 5);
    let outcome = crawl(&config).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_abstract_enrichment() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 5, listing_page(1, 2)).await;

    Mock::given(method("GET"))
        .and(path("/abs/2401.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><blockquote class="abstract mathjax">
            <span class="descriptor">Abstract:</span>  We build a   robot.
            </blockquote></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/abs/2401.00002"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 5);
    config.listing.fetch_abstracts = true;

    let outcome = crawl(&config).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].abstract_text(), Some("We build a robot."));
    assert_eq!(outcome.records[1].abstract_text(), None);
    assert_eq!(outcome.abstracts_missing, 1);
}

#[tokio::test]
async fn test_snapshot_written_to_disk() {
    let server = MockServer::start().await;
    mount_page(&server, 0, 5, listing_page(1, 3)).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&server, 5);
    config.output = OutputConfig {
        json_path: dir.path().join("papers.json").display().to_string(),
        text_path: dir.path().join("papers.txt").display().to_string(),
        text_author_limit: 3,
    };

    let outcome = crawl(&config).await.unwrap();
    let written = write_snapshot(
        &outcome.records,
        &config.output,
        &config.listing.category_label,
    );
    assert!(written.iter().all(|w| w.result.is_ok()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output.json_path).unwrap())
            .unwrap();
    let papers = json.as_array().unwrap();
    assert_eq!(papers.len(), 3);
    assert_eq!(papers[2]["id"], "2401.00003");
    assert_eq!(papers[2]["title"], "Paper 3");
    assert_eq!(papers[2]["authors"][0], "A. Author");
    assert!(papers[2].get("abstract").is_none());

    let text = std::fs::read_to_string(&config.output.text_path).unwrap();
    assert!(text.starts_with("Test Robotics paper list\n"));
    assert!(text.contains("Total: 3 papers"));
    assert!(text.contains("3. Paper 3\n   arXiv ID: 2401.00003\n   Authors: A. Author\n"));
}
