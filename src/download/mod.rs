//! Idempotent, retrying, content-validated downloads.
//!
//! This module turns one [`CandidateRecord`](crate::catalog::CandidateRecord)
//! into at most one file on disk:
//!
//! - an existing file short-circuits before any network traffic, which is
//!   what makes repeat runs idempotent
//! - transient fetch failures retry on a bounded exponential backoff
//!   schedule
//! - responses that do not look like PDF documents are rejected without
//!   being written
//! - PDF bodies are streamed to disk in chunks rather than buffered whole

mod engine;
mod filename;
mod retry;

pub use engine::{DownloadEngine, DownloadOutcome};
pub use filename::safe_filename;
pub use retry::RetryPolicy;
