//! Candidate document records produced by link extraction.

use url::Url;

/// One guideline PDF discovered in the catalog, not yet downloaded.
///
/// Records are immutable once produced by extraction and are dropped after
/// their download attempt completes; no catalog state survives the run.
/// Identity for deduplication purposes is the derived local filename, not
/// the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Absolute download URL, resolved against the site origin.
    pub url: Url,

    /// Basename of the URL path (always non-empty).
    pub filename: String,

    /// Link display text, whitespace-collapsed (may be empty).
    pub title: String,

    /// Guideline identifier (`IMSS-<digits>-<digits>`) found in the
    /// enclosing listing block, when present. Prefixed onto the stored
    /// filename so same-named PDFs from different guidelines stay distinct.
    pub guide_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_records_with_same_fields_are_equal() {
        let make = || CandidateRecord {
            url: Url::parse("https://example.com/a_GER.pdf").unwrap(),
            filename: "a_GER.pdf".to_string(),
            title: "Guideline A".to_string(),
            guide_id: Some("IMSS-001-08".to_string()),
        };
        assert_eq!(make(), make());
    }
}
