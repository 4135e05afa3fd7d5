//! Catalog discovery: pagination and per-page link extraction.
//!
//! The remote catalog is a paginated HTML listing. This module determines
//! how many listing pages exist, extracts the candidate guideline PDFs
//! from each page, and accumulates the full candidate set in page order.
//!
//! # Overview
//!
//! - [`discover_page_count`] - fail-open pagination discovery
//! - [`extract_page`] - one listing page into [`CandidateRecord`]s
//! - [`CatalogBuilder`] - the full paced crawl across all pages

mod builder;
mod extract;
mod pagination;
mod record;

pub use builder::CatalogBuilder;
pub use extract::{extract_page, listing_url};
pub use pagination::discover_page_count;
pub use record::CandidateRecord;

use regex::Regex;
use scraper::Selector;

/// Compiles a hardcoded regex, panicking on invalid patterns.
///
/// Static patterns failing to compile is a programming bug, not a runtime
/// condition.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Compiles a hardcoded CSS selector, panicking on invalid input.
pub(crate) fn compile_static_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector '{css}': {e}"))
}
