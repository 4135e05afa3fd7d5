//! Full-catalog accumulation across listing pages.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::config::HarvestConfig;
use crate::fetch::HttpClient;

use super::extract::extract_page;
use super::pagination::discover_page_count;
use super::record::CandidateRecord;

/// Accumulates candidate records across every listing page, paced by the
/// configured inter-page delay.
///
/// Per-page failures are absorbed: a failed page contributes zero
/// candidates and the remaining pages are still visited. Duplicate
/// filenames across pages are kept; deduplication is filesystem presence
/// at download time.
#[derive(Debug)]
pub struct CatalogBuilder<'a> {
    client: &'a HttpClient,
    config: &'a HarvestConfig,
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder over the run's client and configuration.
    #[must_use]
    pub fn new(client: &'a HttpClient, config: &'a HarvestConfig) -> Self {
        Self { client, config }
    }

    /// Builds the full candidate set in page order.
    ///
    /// Discovers the page count once, then extracts pages `0..count`,
    /// sleeping the configured delay between page fetches. The interrupt
    /// flag is checked between pages so a long crawl can stop cleanly.
    pub async fn build(&self, interrupted: &AtomicBool) -> Vec<CandidateRecord> {
        let page_count = discover_page_count(self.client, &self.config.base_url).await;
        info!(pages = page_count, "starting catalog discovery");

        let mut records = Vec::new();
        for page_index in 0..page_count {
            if interrupted.load(Ordering::SeqCst) {
                warn!(page = page_index, "interrupted; stopping catalog discovery");
                break;
            }
            if page_index > 0 {
                tokio::time::sleep(self.config.page_delay).await;
            }

            match extract_page(self.client, &self.config.base_url, page_index).await {
                Ok(page_records) => {
                    info!(
                        page = page_index + 1,
                        pages = page_count,
                        found = page_records.len(),
                        "listing page extracted"
                    );
                    records.extend(page_records);
                }
                Err(error) => {
                    warn!(
                        page = page_index,
                        %error,
                        "listing page failed; continuing with remaining pages"
                    );
                }
            }
        }

        info!(candidates = records.len(), "catalog complete");
        records
    }
}
