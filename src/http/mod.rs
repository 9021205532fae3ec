//! HTTP Module
//!
//! Single-attempt upstream access and response classification.

mod fetcher;

pub use fetcher::{classify_status, decode_body, HttpFetcher, StatusClass};
