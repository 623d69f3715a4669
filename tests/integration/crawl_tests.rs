//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract and paginate cycle end-to-end.

use newsreel::config::{parse_config, Config, CrawlerConfig, FetcherConfig};
use newsreel::crawler::{crawl, schedule_jobs, Coordinator, HttpFetcher, JobRegistry};
use newsreel::output::{write_articles, ArticleBatch, OutputFormat, CSV_HEADER};
use newsreel::{FetchError, NewsreelError, TerminationReason};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawl settings with no politeness delay
fn test_config(max_pages: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages,
            delay_between_pages: 0,
            same_domain_only: true,
            paginate: true,
        },
        fetcher: FetcherConfig {
            user_agent: "NewsreelTest/1.0".to_string(),
            timeout_secs: 5,
        },
        ..Config::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// A listing page with one `<article>` card per slug
fn listing(slugs: &[&str], next: Option<&str>) -> String {
    let mut body = String::from("<html><head><title>Listing</title></head><body><main>");
    for slug in slugs {
        body.push_str(&format!(
            r#"<article class="story-card">
                <h2 class="headline">Headline for {slug}</h2>
                <a href="/news/{slug}">Read more</a>
                <p>A summary paragraph for story {slug} that is long enough.</p>
                <time datetime="2024-05-01">May 1</time>
            </article>"#
        ));
    }
    body.push_str("</main>");
    if let Some(next) = next {
        body.push_str(&format!(
            r#"<div class="pagination"><a class="next" href="{next}">Next</a></div>"#
        ));
    }
    body.push_str("</body></html>");
    body
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_multi_page_listing() {
    let server = MockServer::start().await;
    mount_page(&server, "/news", listing(&["a", "b"], Some("/news/page/2"))).await;
    mount_page(&server, "/news/page/2", listing(&["b", "c"], Some("/news/page/3"))).await;
    mount_page(&server, "/news/page/3", listing(&["d"], None)).await;

    let start = format!("{}/news", server.uri());
    let outcome = crawl(&start, &test_config(10)).await.expect("crawl failed");

    let titles: Vec<_> = outcome.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Headline for a",
            "Headline for b",
            "Headline for c",
            "Headline for d"
        ]
    );
    assert_eq!(outcome.articles[0].url, format!("{}/news/a", server.uri()));
    assert_eq!(outcome.articles[0].date, "2024-05-01");
    assert!(outcome.articles[0].description.starts_with("A summary paragraph"));

    // Page 3 has no explicit link; the synthesized /news/page/4 is requested and 404s
    assert_eq!(outcome.pages_visited, 3);
    assert!(outcome.stopped_early());
}

#[tokio::test]
async fn test_cyclic_pagination_stops_at_page_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "/news", listing(&["a"], Some("/news/page/2"))).await;
    mount_page(&server, "/news/page/2", listing(&["b"], Some("/news"))).await;

    let start = format!("{}/news", server.uri());
    let outcome = crawl(&start, &test_config(4)).await.expect("crawl failed");

    assert_eq!(outcome.pages_visited, 4);
    assert_eq!(outcome.termination, TerminationReason::PageLimit);
    assert_eq!(outcome.articles.len(), 2);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_first_page_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let start = format!("{}/news", server.uri());
    let result = crawl(&start, &test_config(5)).await;

    assert!(matches!(
        result,
        Err(NewsreelError::Fetch(FetchError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_non_html_first_page_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let start = format!("{}/feed", server.uri());
    let result = crawl(&start, &test_config(5)).await;

    assert!(matches!(
        result,
        Err(NewsreelError::Fetch(FetchError::ContentMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_later_page_failure_keeps_articles() {
    let server = MockServer::start().await;
    mount_page(&server, "/news", listing(&["a", "b"], Some("/news/page/2"))).await;
    Mock::given(method("GET"))
        .and(path("/news/page/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let start = format!("{}/news", server.uri());
    let outcome = crawl(&start, &test_config(5)).await.expect("crawl failed");

    assert_eq!(outcome.articles.len(), 2);
    assert_eq!(outcome.pages_visited, 1);
    match outcome.termination {
        TerminationReason::FetchFailed { url, .. } => assert!(url.ends_with("/news/page/2")),
        other => panic!("unexpected termination: {other:?}"),
    }
}

#[tokio::test]
async fn test_cross_domain_next_is_rejected() {
    let server = MockServer::start().await;
    let port = Url::parse(&server.uri())
        .expect("valid server uri")
        .port()
        .expect("server uri has a port");

    // Same server, different host name
    let foreign = format!("http://localhost:{port}/news/page/2");
    mount_page(&server, "/news", listing(&["a"], Some(&foreign))).await;
    mount_page(&server, "/news/page/2", listing(&["b"], None)).await;

    let start = format!("{}/news", server.uri());
    let outcome = crawl(&start, &test_config(5)).await.expect("crawl failed");

    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(
        outcome.termination,
        TerminationReason::InvalidCandidate { url: foreign.clone() }
    );

    let mut config = test_config(2);
    config.crawler.same_domain_only = false;
    let outcome = crawl(&start, &config).await.expect("crawl failed");
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.articles.len(), 2);
}

#[tokio::test]
async fn test_harvest_fallback_page() {
    let server = MockServer::start().await;
    let body = r#"<html><body>
        <nav><a class="nav-link" href="/news/2024/05/01/menu-entry">Navigation entry that is long</a></nav>
        <a href="/world/europe/2024/elections-results">European election results announced today</a>
        <a href="/about">About us</a>
    </body></html>"#;
    mount_page(&server, "/", body.to_string()).await;

    let mut config = test_config(1);
    config.crawler.paginate = false;
    let outcome = crawl(&format!("{}/", server.uri()), &config)
        .await
        .expect("crawl failed");

    assert_eq!(outcome.articles.len(), 1);
    assert_eq!(
        outcome.articles[0].title,
        "European election results announced today"
    );
    assert_eq!(outcome.termination, TerminationReason::PaginationDisabled);
}

#[tokio::test]
async fn test_coordinator_with_http_fetcher_writes_csv() {
    let server = MockServer::start().await;
    mount_page(&server, "/news", listing(&["a", "b"], None)).await;

    let config = test_config(1);
    let fetcher = HttpFetcher::new(&config.fetcher).expect("client builds");
    let coordinator = Coordinator::new(fetcher, config.crawler.clone());
    let start = Url::parse(&format!("{}/news", server.uri())).expect("valid url");
    let outcome = coordinator.crawl(start).await.expect("crawl failed");

    let dir = TempDir::new().expect("temp dir");
    let out = dir.path().join("articles.csv");
    let written =
        write_articles(&out, &outcome.articles, OutputFormat::Csv, false).expect("write failed");
    assert_eq!(written, 2);

    let csv = std::fs::read_to_string(&out).expect("read output");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
    assert!(lines.next().is_some_and(|row| row.starts_with("Headline for a,")));
}

#[tokio::test]
async fn test_scheduled_job_appends_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/news", listing(&["a", "b"], None)).await;

    let dir = TempDir::new().expect("temp dir");
    let out = dir.path().join("job.json");
    let toml = format!(
        r#"
[crawler]
max-pages = 1
delay-between-pages = 0

[[job]]
name = "mock-news"
url = "{}/news"
interval-secs = 3600
output = "{}"
"#,
        server.uri(),
        out.display()
    );
    let config = parse_config(&toml).expect("valid config");

    let mut registry = JobRegistry::new();
    schedule_jobs(&mut registry, &config).expect("jobs scheduled");
    assert_eq!(registry.job_ids(), ["mock-news"]);

    // The first run starts immediately
    let mut batch = None;
    for _ in 0..50 {
        if let Ok(content) = std::fs::read_to_string(&out) {
            if let Ok(parsed) = serde_json::from_str::<ArticleBatch>(&content) {
                batch = Some(parsed);
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    registry.shutdown();

    let batch = batch.expect("scheduled job wrote output");
    assert_eq!(batch.total_articles, 2);
    assert_eq!(batch.articles.len(), 2);
}

#[tokio::test]
async fn test_invalid_start_url() {
    let result = crawl("ftp://example.com/news", &test_config(1)).await;
    assert!(matches!(result, Err(NewsreelError::UrlError(_))));
}
