//! Run configuration and tunable constants.
//!
//! Every knob the pipeline honors lives in [`HarvestConfig`], an explicit
//! value passed to the components that need it. There is no process-wide
//! mutable state.

use std::path::PathBuf;
use std::time::Duration;

/// Default catalog root for the IMSS clinical guideline listing.
pub const DEFAULT_BASE_URL: &str = "https://www.imss.gob.mx/guias_practicaclinica";

/// Default output directory for downloaded guideline PDFs.
pub const DEFAULT_OUTPUT_DIR: &str = "imss_pdfs";

/// Default maximum download attempts per candidate (including the first).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff (doubles each attempt).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Default pause between listing-page fetches.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Default pause between downloads.
pub const DEFAULT_DOWNLOAD_DELAY: Duration = Duration::from_millis(500);

/// Bodies below this size that also lack a PDF content type are rejected.
pub const MIN_VALID_BODY_BYTES: u64 = 1000;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Tunable parameters for one harvest run.
///
/// # Example
///
/// ```
/// use gpc_harvester::HarvestConfig;
///
/// let mut config = HarvestConfig::new("https://www.imss.gob.mx/guias_practicaclinica", "pdfs");
/// config.max_attempts = 5;
/// ```
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Catalog root URL; listing pages are addressed relative to it.
    pub base_url: String,

    /// Directory downloaded files are written to (created at startup).
    pub output_dir: PathBuf,

    /// Maximum download attempts per candidate, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts.
    pub backoff_base: Duration,

    /// Pause between listing-page fetches.
    pub page_delay: Duration,

    /// Pause between downloads.
    pub download_delay: Duration,

    /// Minimum plausible size for a body without a PDF content type.
    pub min_valid_body_bytes: u64,

    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl HarvestConfig {
    /// Creates a configuration for `base_url` writing into `output_dir`,
    /// with every other knob at its default.
    #[must_use]
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            output_dir: output_dir.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            page_delay: DEFAULT_PAGE_DELAY,
            download_delay: DEFAULT_DOWNLOAD_DELAY,
            min_valid_body_bytes: MIN_VALID_BODY_BYTES,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR)
    }
}
