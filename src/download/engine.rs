//! Per-candidate download engine.
//!
//! One [`download`](DownloadEngine::download) call performs the full
//! existence-check → fetch → validate → write sequence for a single
//! candidate and reports the outcome as a value; no error crosses the
//! engine boundary.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::catalog::CandidateRecord;
use crate::config::HarvestConfig;
use crate::fetch::{FetchError, HttpClient};

use super::filename::safe_filename;
use super::retry::RetryPolicy;

/// Outcome of the download sequence for one candidate, produced once per
/// candidate per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The document was fetched, validated and written.
    Success,

    /// A file with the derived name already exists; nothing was fetched.
    AlreadyExists,

    /// The response did not look like a PDF document; nothing was written.
    InvalidContent,

    /// Every attempt failed, or the file could not be written.
    Failed,
}

/// Failure modes of a single attempt. Fetch problems are retried; local IO
/// problems are not (a failing disk does not recover on backoff).
enum AttemptError {
    Fetch(FetchError),
    Io(std::io::Error),
}

/// Downloads candidate records to deterministic paths under the output
/// directory, at most once each.
///
/// # Example
///
/// ```no_run
/// use gpc_harvester::{DownloadEngine, HarvestConfig, HttpClient};
/// # async fn example(record: &gpc_harvester::CandidateRecord) {
/// let config = HarvestConfig::default();
/// let engine = DownloadEngine::new(HttpClient::new(), &config);
/// let outcome = engine.download(record).await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    client: HttpClient,
    output_dir: PathBuf,
    retry: RetryPolicy,
    min_valid_body_bytes: u64,
}

impl DownloadEngine {
    /// Creates an engine bound to the run's client and configuration.
    #[must_use]
    pub fn new(client: HttpClient, config: &HarvestConfig) -> Self {
        Self {
            client,
            output_dir: config.output_dir.clone(),
            retry: RetryPolicy::new(config.max_attempts, config.backoff_base),
            min_valid_body_bytes: config.min_valid_body_bytes,
        }
    }

    /// Returns the path a record is (or would be) stored at.
    #[must_use]
    pub fn target_path(&self, record: &CandidateRecord) -> PathBuf {
        self.output_dir.join(safe_filename(record))
    }

    /// Downloads one candidate.
    ///
    /// The existence check runs before any network traffic, so files
    /// materialized by an earlier run are skipped outright. Fetch failures
    /// retry on the policy's backoff schedule; content-validation
    /// rejections and local write failures do not retry.
    pub async fn download(&self, record: &CandidateRecord) -> DownloadOutcome {
        let path = self.target_path(record);
        if path.exists() {
            info!(path = %path.display(), "skipping download, file already exists");
            return DownloadOutcome::AlreadyExists;
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            debug!(url = %record.url, attempt, "attempting download");

            match self.attempt(record, &path).await {
                Ok(outcome) => return outcome,
                Err(AttemptError::Io(error)) => {
                    warn!(path = %path.display(), %error, "write failed; not retrying");
                    return DownloadOutcome::Failed;
                }
                Err(AttemptError::Fetch(error)) => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        warn!(
                            url = %record.url,
                            attempt,
                            delay_ms = delay.as_millis(),
                            error = %error,
                            "attempt failed; backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!(
                            url = %record.url,
                            attempts = attempt,
                            error = %error,
                            "download failed after all attempts"
                        );
                        return DownloadOutcome::Failed;
                    }
                },
            }
        }
    }

    /// Runs one fetch → validate → write attempt.
    async fn attempt(
        &self,
        record: &CandidateRecord,
        path: &Path,
    ) -> Result<DownloadOutcome, AttemptError> {
        let response = self
            .client
            .get(record.url.as_str())
            .await
            .map_err(AttemptError::Fetch)?;

        if is_pdf_response(&response) {
            let written = stream_to_file(response, record.url.as_str(), path).await?;
            info!(path = %path.display(), bytes = written, "download complete");
            return Ok(DownloadOutcome::Success);
        }

        // No PDF content type: buffer the body so the plausibility check
        // runs before anything touches the disk.
        let body = response
            .bytes()
            .await
            .map_err(|e| AttemptError::Fetch(body_error(record.url.as_str(), e)))?;

        if (body.len() as u64) < self.min_valid_body_bytes {
            warn!(
                url = %record.url,
                bytes = body.len(),
                "response does not look like a valid PDF; skipping"
            );
            return Ok(DownloadOutcome::InvalidContent);
        }

        if let Err(error) = write_buffered(path, &body).await {
            cleanup_partial(path).await;
            return Err(AttemptError::Io(error));
        }
        info!(path = %path.display(), bytes = body.len(), "download complete");
        Ok(DownloadOutcome::Success)
    }
}

/// Whether the response's declared content type indicates a PDF document.
fn is_pdf_response(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("pdf"))
}

/// Maps a body-read failure into the fetch taxonomy.
fn body_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(url)
    } else {
        FetchError::network(url, error)
    }
}

/// Streams the response body to `path` in chunks, returning bytes written.
///
/// A partial file left behind by a mid-stream failure is removed so the
/// next attempt sees the same world as the existence check did.
async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, AttemptError> {
    let file = File::create(path).await.map_err(AttemptError::Io)?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(error) => {
                cleanup_partial(path).await;
                return Err(AttemptError::Fetch(body_error(url, error)));
            }
        };
        if let Err(error) = writer.write_all(&chunk).await {
            cleanup_partial(path).await;
            return Err(AttemptError::Io(error));
        }
        bytes_written += chunk.len() as u64;
    }

    if let Err(error) = writer.flush().await {
        cleanup_partial(path).await;
        return Err(AttemptError::Io(error));
    }

    Ok(bytes_written)
}

/// Writes an already-buffered body to `path`.
async fn write_buffered(path: &Path, body: &[u8]) -> Result<(), std::io::Error> {
    let mut file = File::create(path).await?;
    file.write_all(body).await?;
    file.flush().await?;
    Ok(())
}

async fn cleanup_partial(path: &Path) {
    debug!(path = %path.display(), "cleaning up partial file");
    let _ = tokio::fs::remove_file(path).await;
}
