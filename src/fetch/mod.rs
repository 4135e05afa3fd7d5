//! HTTP fetching with a persistent session identity.
//!
//! This module provides the [`HttpClient`] used for both listing pages and
//! document bodies. The client is constructed once per run with a
//! browser-like User-Agent and an in-process cookie store, so identity and
//! any session cookies carry across every request.
//!
//! The fetcher itself never retries; retry is the download engine's
//! responsibility, and listing fetch failures fail the whole page.

mod client;
mod error;

pub use client::{BROWSER_USER_AGENT, HttpClient};
pub use error::FetchError;
