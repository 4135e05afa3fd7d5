//! Link extraction and guide-id correlation for one listing page.
//!
//! Walks every hyperlink on a listing page and keeps the GER guideline
//! PDFs: the href path must end in `.pdf` and its basename must contain
//! `GER` case-insensitively (the sibling GRR quick-reference variant is
//! excluded). Each kept link is resolved to an absolute URL against the
//! site origin and enriched with the guideline identifier found in its
//! enclosing listing block.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::fetch::{FetchError, HttpClient};

use super::record::CandidateRecord;
use super::{compile_static_regex, compile_static_selector};

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a[href]"));

/// Guideline identifier pattern correlating a PDF to its source guideline.
static GUIDE_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"IMSS-\d+-\d+"));

/// Element names treated as a listing block when walking up from a link.
const CONTAINER_TAGS: [&str; 3] = ["div", "section", "article"];

/// Substring a kept filename must contain (case-insensitive).
const WANTED_FILENAME_MARKER: &str = "GER";

/// Builds the listing URL for a zero-based page index.
#[must_use]
pub fn listing_url(base_url: &str, page_index: usize) -> String {
    format!("{base_url}?field_categoria_gs_value=All&page={page_index}")
}

/// Fetches one listing page and extracts its candidate records.
///
/// Each call fetches fresh; pages are independent. Candidates are returned
/// in document order.
///
/// # Errors
///
/// Returns `FetchError` when the listing fetch fails or `base_url` is not a
/// valid absolute URL. Callers absorb the error and the page contributes
/// zero candidates.
pub async fn extract_page(
    client: &HttpClient,
    base_url: &str,
    page_index: usize,
) -> Result<Vec<CandidateRecord>, FetchError> {
    let origin = site_origin(base_url)?;
    let url = listing_url(base_url, page_index);
    debug!(page = page_index, url = %url, "fetching listing page");

    let html = client.get_text(&url).await?;
    Ok(records_from_listing(&html, &origin))
}

/// Resolves the root origin that document links are joined against.
fn site_origin(base_url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(base_url).map_err(|_| FetchError::invalid_url(base_url))?;
    let origin = parsed.origin().ascii_serialization();
    Url::parse(&origin).map_err(|_| FetchError::invalid_url(base_url))
}

/// Extracts candidate records from listing markup.
///
/// Pure so the filter and correlation rules can be exercised without a
/// server.
pub(crate) fn records_from_listing(html: &str, origin: &Url) -> Vec<CandidateRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let Some(record) = record_from_link(link, href, origin) {
            records.push(record);
        }
    }

    records
}

/// Applies the keep/skip rules to a single hyperlink.
fn record_from_link(link: ElementRef<'_>, href: &str, origin: &Url) -> Option<CandidateRecord> {
    let filename = pdf_basename(href)?;
    if !filename
        .to_uppercase()
        .contains(WANTED_FILENAME_MARKER)
    {
        return None;
    }

    let url = origin.join(href).ok()?;
    let title = collapse_whitespace(&link.text().collect::<String>());
    let guide_id = guide_id_for(link);

    Some(CandidateRecord {
        url,
        filename,
        title,
        guide_id,
    })
}

/// Returns the basename of the href's path when it names a PDF.
///
/// Query and fragment are not part of the path and are stripped first.
fn pdf_basename(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    if !path.ends_with(".pdf") {
        return None;
    }
    let basename = path.rsplit('/').next().unwrap_or(path);
    (!basename.is_empty()).then(|| basename.to_string())
}

/// Collapses runs of whitespace in link text into single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Walks up from the link to the nearest listing block and searches its
/// full text for a guideline identifier. First match wins.
fn guide_id_for(link: ElementRef<'_>) -> Option<String> {
    let container = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| CONTAINER_TAGS.contains(&el.value().name()))?;

    let text = container.text().collect::<String>();
    GUIDE_ID_RE
        .find(&text)
        .map(|found| found.as_str().to_string())
}
