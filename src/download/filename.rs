//! Safe local filename derivation for candidate records.

use crate::catalog::CandidateRecord;

/// Computes the local filename a record is stored under.
///
/// Every character outside `[A-Za-z0-9_.-]` is replaced with `_`, and the
/// guideline identifier, when present, is prepended so same-named PDFs from
/// different guidelines land in distinct files.
#[must_use]
pub fn safe_filename(record: &CandidateRecord) -> String {
    let sanitized = sanitize(&record.filename);
    match record.guide_id.as_deref() {
        Some(guide_id) => format!("{}_{sanitized}", sanitize(guide_id)),
        None => sanitized,
    }
}

/// Replaces characters outside `[A-Za-z0-9_.-]` with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
