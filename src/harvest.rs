//! Run orchestration: catalog build, paced downloads, outcome accounting.
//!
//! The orchestrator sequences the whole job: create the output directory,
//! build the full catalog, then download every candidate strictly in
//! discovery order with a fixed pause between downloads. Candidates are
//! processed one at a time; the pacing delays are deliberate politeness
//! toward the remote server, enforced here and configured in
//! [`HarvestConfig`].
//!
//! Only output-directory creation can fail the run. Every later problem is
//! absorbed into the [`RunSummary`], so a harvest always completes and
//! always ends with a summary.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::CatalogBuilder;
use crate::config::HarvestConfig;
use crate::download::{DownloadEngine, DownloadOutcome};
use crate::fetch::HttpClient;

/// Fatal startup errors for a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Aggregate outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files fetched, validated and written this run.
    pub success: usize,

    /// Candidates skipped because their file was already on disk.
    pub already_exists: usize,

    /// Responses rejected by content validation.
    pub invalid: usize,

    /// Candidates that exhausted retries or failed to write.
    pub failed: usize,

    /// Resolved output directory files were written under.
    pub output_dir: PathBuf,

    /// Whether the run was cut short by an interrupt.
    pub interrupted: bool,
}

impl RunSummary {
    /// Tallies one download outcome.
    fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success => self.success += 1,
            DownloadOutcome::AlreadyExists => self.already_exists += 1,
            DownloadOutcome::InvalidContent => self.invalid += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }

    /// Total candidates processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.success + self.already_exists + self.invalid + self.failed
    }
}

/// Sequences a whole harvest run.
///
/// # Example
///
/// ```no_run
/// use gpc_harvester::{HarvestConfig, Harvester};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let harvester = Harvester::new(HarvestConfig::default());
/// let summary = harvester.run().await?;
/// println!("downloaded {} guideline PDFs", summary.success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
}

impl Harvester {
    /// Creates a harvester for the given configuration.
    #[must_use]
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Runs the full crawl-filter-download pipeline to completion.
    ///
    /// # Errors
    ///
    /// Fails only when the output directory cannot be created; every later
    /// problem is absorbed into the summary.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        self.run_with_interrupt(Arc::new(AtomicBool::new(false)))
            .await
    }

    /// Runs the pipeline, stopping cleanly between page fetches and
    /// between downloads once `interrupted` becomes true.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_with_interrupt(
        &self,
        interrupted: Arc<AtomicBool>,
    ) -> Result<RunSummary, HarvestError> {
        info!(base_url = %self.config.base_url, "harvest starting");

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|source| HarvestError::OutputDir {
                path: self.config.output_dir.clone(),
                source,
            })?;
        let output_dir = self
            .config
            .output_dir
            .canonicalize()
            .unwrap_or_else(|_| self.config.output_dir.clone());

        let client = HttpClient::with_timeouts(
            self.config.connect_timeout_secs,
            self.config.read_timeout_secs,
        );

        let catalog = CatalogBuilder::new(&client, &self.config)
            .build(&interrupted)
            .await;
        let total = catalog.len();
        info!(candidates = total, "starting downloads");

        let engine = DownloadEngine::new(client, &self.config);
        let mut summary = RunSummary {
            output_dir,
            ..RunSummary::default()
        };

        for (index, record) in catalog.iter().enumerate() {
            if interrupted.load(Ordering::SeqCst) {
                warn!(processed = index, total, "interrupted; stopping downloads");
                break;
            }
            if index > 0 {
                tokio::time::sleep(self.config.download_delay).await;
            }

            info!(item = index + 1, total, file = %record.filename, "processing candidate");
            summary.record(engine.download(record).await);
        }

        summary.interrupted = interrupted.load(Ordering::SeqCst);

        info!(
            success = summary.success,
            failed = summary.failed,
            already_exists = summary.already_exists,
            invalid = summary.invalid,
            output_dir = %summary.output_dir.display(),
            "harvest complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_records_each_outcome_kind() {
        let mut summary = RunSummary::default();
        summary.record(DownloadOutcome::Success);
        summary.record(DownloadOutcome::Success);
        summary.record(DownloadOutcome::AlreadyExists);
        summary.record(DownloadOutcome::InvalidContent);
        summary.record(DownloadOutcome::Failed);

        assert_eq!(summary.success, 2);
        assert_eq!(summary.already_exists, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_empty_summary_totals_zero() {
        let summary = RunSummary::default();
        assert_eq!(summary.total(), 0);
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_output_dir_error_display_names_path() {
        let error = HarvestError::OutputDir {
            path: PathBuf::from("/nonexistent/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = error.to_string();
        assert!(msg.contains("/nonexistent/out"), "Expected path in: {msg}");
        assert!(
            msg.contains("cannot create output directory"),
            "Expected cause in: {msg}"
        );
    }
}
