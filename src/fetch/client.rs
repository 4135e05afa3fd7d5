//! HTTP client wrapper shared by listing and document fetches.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

use super::error::FetchError;

/// Browser User-Agent attached to every request.
///
/// The catalog's CDN occasionally rejects obviously non-browser agents, so
/// the client identifies as a mainstream browser for the whole session.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// HTTP client holding the session identity for one run.
///
/// The client is created once and reused for every request, so connection
/// pooling and any session cookies set by the site carry across the whole
/// crawl.
///
/// # Example
///
/// ```no_run
/// use gpc_harvester::fetch::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let body = client.get_text("https://example.com/catalog").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Cookie store and gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .cookie_store(true)
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Issues a GET request and checks the response status.
    ///
    /// The returned response body has not been consumed; callers choose
    /// between buffered reads and streaming via `bytes_stream()`, so large
    /// documents never need to be held in memory up front.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Timeout` or `FetchError::Network` on transport
    /// failure, and `FetchError::HttpStatus` for non-2xx responses.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }

    /// Fetches a page and buffers the whole body as text.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get), plus `Network`/`Timeout`
    /// when the body read fails mid-transfer.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })
    }
}
