//! Integration tests for the scraper
//!
//! These tests use wiremock to serve product pages and exercise fetching,
//! the pipeline, retries, and a full interactive session end-to-end.

use async_trait::async_trait;
use shopscrape::config::{Config, HttpConfig};
use shopscrape::model::{CSV_HEADERS, PLACEHOLDER_PRICE};
use shopscrape::output::{read_records, verify_file, CsvRecordWriter};
use shopscrape::scrape::{
    check_connection, FetchResult, HtmlExtractor, HttpFetcher, PageFetcher, RetryOutcome,
    RetryPolicy, RetryRunner, ScrapePipeline,
};
use shopscrape::session::{
    Console, InteractiveSession, PreviewSettings, SessionState, TerminationReason,
};
use shopscrape::{ErrorCategory, ProductRecord, ScrapeError};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing page with one product card per `(title, price, description)`
fn listing_page(products: &[(&str, Option<&str>, &str)]) -> String {
    let cards: String = products
        .iter()
        .map(|(title, price, description)| {
            let price = price
                .map(|p| format!(r#"<h4 class="price float-end card-title pull-right">{}</h4>"#, p))
                .unwrap_or_default();
            format!(
                r#"<div class="col-md-4 col-xl-4 col-lg-4">
                    <div class="card thumbnail"><div class="caption">
                        {}
                        <h4><a href="/product" class="title" title="{}">{}</a></h4>
                        <p class="description card-text">{}</p>
                    </div></div>
                </div>"#,
                price, title, title, description
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html><head><title>Allinone</title></head>
        <body><div class="container"><div class="row">{}</div></div></body></html>"#,
        cards
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[derive(Default)]
struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    fn new(lines: Vec<String>) -> Self {
        Self {
            input: lines.into(),
            output: Vec::new(),
        }
    }

    fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn print_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

#[tokio::test]
async fn test_fetcher_returns_markup_and_sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop"))
        .and(header("upgrade-insecure-requests", "1"))
        .respond_with(html_response("<html>ok</html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let url = format!("{}/shop", server.uri());

    match fetcher.fetch(&url).await {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            assert_eq!(final_url, url);
            assert_eq!(status_code, 200);
            assert_eq!(body, "<html>ok</html>");
        }
        other => panic!("unexpected fetch result: {:?}", other),
    }

    let requests = server.received_requests().await.unwrap();
    let user_agent = requests[0].headers.get("user-agent").unwrap();
    assert!(user_agent.to_str().unwrap().starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn test_server_error_yields_absent_and_skips_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop"))
        .respond_with(ResponseTemplate::new(500).set_body_string(listing_page(&[(
            "Lamp",
            Some("$20"),
            "Desk lamp",
        )])))
        .mount(&server)
        .await;

    let url = format!("{}/shop", server.uri());
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    assert!(fetcher.fetch(&url).await.into_markup().is_none());

    let matched = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = matched.clone();
    let extractor = HtmlExtractor::with_matcher(move |_: &scraper::ElementRef<'_>| {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        true
    })
    .unwrap();
    let pipeline = ScrapePipeline::new(fetcher, extractor);

    let err = pipeline.run(&url).await.unwrap_err();
    assert!(matches!(err, ScrapeError::HttpStatus { status: 500, .. }));
    assert_eq!(matched.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            html_response("<html>slow</html>".to_string()).set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let fetcher = HttpFetcher::with_client(client);
    let result = fetcher.fetch(&format!("{}/slow", server.uri())).await;

    assert!(matches!(result, FetchResult::Timeout));
}

/// Returns a local URL whose port had a listener that is now closed
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/shop", port)
}

#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    let url = closed_port_url();
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();

    let result = fetcher.fetch(&url).await;
    assert!(
        matches!(result, FetchResult::ConnectError { .. }),
        "unexpected fetch result: {:?}",
        result
    );

    let pipeline = ScrapePipeline::new(fetcher, HtmlExtractor::new().unwrap());
    let err = pipeline.run(&url).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Connect { .. }));
    assert_eq!(err.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn test_pipeline_extracts_page_in_document_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop"))
        .respond_with(html_response(listing_page(&[
            ("Asus VivoBook", Some("$295.99"), "Chocolate Black, 14\""),
            ("Widget A", None, " A fine widget "),
            ("Nokia 123", Some("$24.99"), "7 day battery"),
        ])))
        .mount(&server)
        .await;

    let pipeline = ScrapePipeline::from_config(&HttpConfig::default()).unwrap();
    let records = pipeline
        .run(&format!("{}/shop", server.uri()))
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title(), "Asus VivoBook");
    assert_eq!(
        records[1],
        ProductRecord::new("Widget A", PLACEHOLDER_PRICE, "A fine widget")
    );
    assert_eq!(records[2].price(), "$24.99");
}

#[tokio::test]
async fn test_page_without_products_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(html_response(listing_page(&[])))
        .mount(&server)
        .await;

    let pipeline = ScrapePipeline::from_config(&HttpConfig::default()).unwrap();
    let err = pipeline
        .run(&format!("{}/empty", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::NoRecords));
}

#[tokio::test]
async fn test_retry_runner_hits_server_max_attempts_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let runner = RetryRunner::new(
        ScrapePipeline::from_config(&HttpConfig::default()).unwrap(),
        RetryPolicy::new(3, Duration::ZERO),
        CancellationToken::new(),
    );

    let outcome = runner
        .run_with_retry(&format!("{}/flaky", server.uri()))
        .await;
    assert!(matches!(
        outcome,
        RetryOutcome::Exhausted {
            attempts: 3,
            last_error: Some(ScrapeError::HttpStatus { status: 503, .. })
        }
    ));
}

#[tokio::test]
async fn test_retry_runner_recovers_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recover"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recover"))
        .respond_with(html_response(listing_page(&[("Lamp", Some("$20"), "Desk lamp")])))
        .mount(&server)
        .await;

    let runner = RetryRunner::new(
        ScrapePipeline::from_config(&HttpConfig::default()).unwrap(),
        RetryPolicy::new(3, Duration::ZERO),
        CancellationToken::new(),
    );

    match runner
        .run_with_retry(&format!("{}/recover", server.uri()))
        .await
    {
        RetryOutcome::Success { records, stats } => {
            assert_eq!(records.len(), 1);
            assert_eq!(stats.attempts, 2);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_check_connection_reports_size_and_preview() {
    let server = MockServer::start().await;
    let body = format!("<html>\n<body>{}</body>\n</html>", "x".repeat(200));
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(body.clone()))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let report = check_connection(&fetcher, &format!("{}/", server.uri()))
        .await
        .unwrap();

    assert_eq!(report.content_length, body.chars().count());
    assert_eq!(report.preview.chars().count(), 100);
    assert!(report.preview.starts_with("<html> <body>"));
}

#[tokio::test]
async fn test_check_connection_rejects_invalid_url() {
    let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
    let err = check_connection(&fetcher, "example.com").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[tokio::test]
async fn test_interactive_session_scrapes_saves_and_exits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop"))
        .respond_with(html_response(listing_page(&[
            ("Lamp", Some("$20.00"), "Desk lamp, warm light"),
            ("Mug", Some("$5.00"), &"Ceramic ".repeat(40)),
            ("Chair", None, "Oak"),
            ("Desk", Some("$120.00"), "Standing desk"),
            ("Shelf", Some("$45.00"), "Wall shelf"),
            ("Rug", Some("$60.00"), "Wool rug"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out_dir = tmp.path().join("collected_data");
    let mut config = Config::default();
    config.output.directory = out_dir.clone();

    let shop_url = format!("{}/shop", server.uri());
    let rejected_url = shop_url.replacen("http://", "HTTP://", 1);
    let console = ScriptedConsole::new(vec![
        "   ".to_string(),
        rejected_url,
        format!("  {}  ", shop_url),
        "Exit".to_string(),
    ]);

    let mut session =
        InteractiveSession::from_config(console, &config, CancellationToken::new()).unwrap();
    assert!(out_dir.is_dir());

    let summary = session.run().await;
    assert_eq!(summary.successful_runs, 1);
    assert_eq!(summary.reason, TerminationReason::ExitCommand);
    assert_eq!(session.state(), SessionState::Terminated);

    let console = session.console();
    assert!(console.printed("[Product 5]"));
    assert!(!console.printed("[Product 6]"));
    assert!(console.printed("* 1 more records not shown"));
    assert!(console.printed("Data rows: 6"));
    assert!(console.printed("Total runs: 1"));

    let files: Vec<_> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let report = verify_file(&files[0]).unwrap();
    assert_eq!(report.data_rows, 6);
    assert_eq!(report.header, CSV_HEADERS.to_vec());

    // The file keeps full descriptions even though the preview cut them
    let records = read_records(&files[0]).unwrap();
    assert_eq!(records[1].description(), "Ceramic ".repeat(40).trim());
    assert_eq!(records[2].price(), PLACEHOLDER_PRICE);
}

#[tokio::test]
async fn test_interactive_session_interrupted_before_input() {
    let tmp = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let runner = RetryRunner::new(
        ScrapePipeline::from_config(&HttpConfig::default()).unwrap(),
        RetryPolicy::default(),
        cancel.clone(),
    );
    let mut session = InteractiveSession::new(
        ScriptedConsole::new(vec!["https://example.com/shop".to_string()]),
        runner,
        Box::new(CsvRecordWriter::new(tmp.path()).unwrap()),
        cancel.clone(),
        PreviewSettings::default(),
    );

    cancel.cancel();
    let summary = session.run().await;

    assert_eq!(summary.reason, TerminationReason::Interrupted);
    assert_eq!(summary.successful_runs, 0);
    assert!(session.console().printed("Total runs: 0"));
}
