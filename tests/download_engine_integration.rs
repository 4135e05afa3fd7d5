//! Integration tests for the download engine.
//!
//! These tests verify idempotence, retry/backoff, and content validation
//! against mock HTTP servers.

use std::time::Duration;

use gpc_harvester::{CandidateRecord, DownloadEngine, DownloadOutcome, HarvestConfig, HttpClient};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Engine config pointed at a temp dir, with a fast backoff so retry tests
/// do not sleep for real seconds.
fn test_config(output_dir: &std::path::Path) -> HarvestConfig {
    let mut config = HarvestConfig::new("http://unused.invalid", output_dir);
    config.backoff_base = Duration::from_millis(10);
    config
}

fn candidate(server: &MockServer, path_str: &str, guide_id: Option<&str>) -> CandidateRecord {
    let url = Url::parse(&format!("{}{path_str}", server.uri())).expect("valid test URL");
    let filename = path_str
        .rsplit('/')
        .next()
        .expect("test path has a basename")
        .to_string();
    CandidateRecord {
        url,
        filename,
        title: "Test guideline".to_string(),
        guide_id: guide_id.map(str::to_string),
    }
}

async fn mount_pdf(server: &MockServer, path_str: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(content.to_vec()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_download_writes_file_once_then_skips() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let content = b"%PDF-1.4 guideline body";
    mount_pdf(&server, "/d/IMSS-123-45_GER.pdf", content).await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/IMSS-123-45_GER.pdf", None);

    // First run downloads.
    let outcome = engine.download(&record).await;
    assert_eq!(outcome, DownloadOutcome::Success);
    let file_path = temp_dir.path().join("IMSS-123-45_GER.pdf");
    assert_eq!(std::fs::read(&file_path).expect("file readable"), content);

    // Second run skips without touching the file.
    let outcome = engine.download(&record).await;
    assert_eq!(outcome, DownloadOutcome::AlreadyExists);
    assert_eq!(std::fs::read(&file_path).expect("file readable"), content);
}

#[tokio::test]
async fn test_guide_id_prefixes_stored_filename() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    mount_pdf(&server, "/d/x_GER.pdf", b"%PDF-1.4").await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", Some("IMSS-123-45"));

    assert_eq!(engine.download(&record).await, DownloadOutcome::Success);
    assert!(temp_dir.path().join("IMSS-123-45_x_GER.pdf").exists());
    assert!(!temp_dir.path().join("x_GER.pdf").exists());
}

#[tokio::test]
async fn test_transient_failures_retry_then_succeed() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // Two 503s, then a good response: with 3 attempts the download must
    // recover.
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 recovered".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", None);

    assert_eq!(engine.download(&record).await, DownloadOutcome::Success);
    assert!(temp_dir.path().join("x_GER.pdf").exists());
}

#[tokio::test]
async fn test_exhausted_attempts_report_failed() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // Always failing: exactly max_attempts requests, then Failed.
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", None);

    assert_eq!(engine.download(&record).await, DownloadOutcome::Failed);
    assert!(!temp_dir.path().join("x_GER.pdf").exists());
}

#[tokio::test]
async fn test_small_non_pdf_body_is_invalid_content_without_retry() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // An error page: text/html and well under the plausibility threshold.
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(vec![b'x'; 500]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", None);

    assert_eq!(engine.download(&record).await, DownloadOutcome::InvalidContent);
    assert!(
        !temp_dir.path().join("x_GER.pdf").exists(),
        "invalid content must not be written"
    );
}

#[tokio::test]
async fn test_large_body_without_pdf_type_is_still_written() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // Misconfigured server: no PDF content type, but a plausible body.
    let content = vec![b'y'; 2000];
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(content.clone()),
        )
        .mount(&server)
        .await;

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", None);

    assert_eq!(engine.download(&record).await, DownloadOutcome::Success);
    assert_eq!(
        std::fs::read(temp_dir.path().join("x_GER.pdf")).expect("file readable"),
        content
    );
}

#[tokio::test]
async fn test_existing_file_short_circuits_before_any_request() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // No network traffic may reach the server for an existing file.
    Mock::given(method("GET"))
        .and(path("/d/x_GER.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    std::fs::write(temp_dir.path().join("x_GER.pdf"), b"preexisting").expect("seed file");

    let engine = DownloadEngine::new(HttpClient::new(), &test_config(temp_dir.path()));
    let record = candidate(&server, "/d/x_GER.pdf", None);

    assert_eq!(engine.download(&record).await, DownloadOutcome::AlreadyExists);
    assert_eq!(
        std::fs::read(temp_dir.path().join("x_GER.pdf")).expect("file readable"),
        b"preexisting"
    );
}
