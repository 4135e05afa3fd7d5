//! Page-count discovery for the paginated catalog listing.
//!
//! The listing exposes a `ul.pager` navigation element whose last page link
//! carries a zero-based `page=<N>` query parameter; the page count is
//! `N + 1`. Discovery is fail-open: a missing pager, an unparsable href, or
//! a failed fetch all fall back to a single page so a markup change never
//! aborts a run. The fallback is logged at warn level because it can
//! silently truncate a multi-page catalog.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::fetch::HttpClient;

use super::{compile_static_regex, compile_static_selector};

static PAGER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("ul.pager"));

static PAGER_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a[href]"));

static PAGE_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"page=(\d+)"));

/// Determines how many listing pages the catalog spans.
///
/// Fetches the catalog root filtered to all categories and reads the last
/// pager link. Always returns at least 1; every failure falls back to a
/// single-page assumption rather than propagating.
pub async fn discover_page_count(client: &HttpClient, base_url: &str) -> usize {
    let url = format!("{base_url}?field_categoria_gs_value=All");
    let html = match client.get_text(&url).await {
        Ok(body) => body,
        Err(error) => {
            warn!(%error, "catalog root fetch failed; assuming a single page");
            return 1;
        }
    };

    match page_count_from_listing(&html) {
        Some(count) => {
            debug!(pages = count, "pagination control found");
            count
        }
        None => {
            warn!("no usable pagination control; assuming a single page (a multi-page catalog would be truncated)");
            1
        }
    }
}

/// Extracts the page count from listing markup, if a usable pager exists.
///
/// Pages are numbered from zero, so the count is the last referenced index
/// plus one.
pub(crate) fn page_count_from_listing(html: &str) -> Option<usize> {
    let document = Html::parse_document(html);
    let pager = document.select(&PAGER_SELECTOR).next()?;
    let last_link = pager.select(&PAGER_LINK_SELECTOR).last()?;
    let href = last_link.value().attr("href")?;
    let index: usize = PAGE_PARAM_RE.captures(href)?.get(1)?.as_str().parse().ok()?;
    Some(index + 1)
}
