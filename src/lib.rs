//! Sleeper Core - cached, rate-limit-aware access to the Sleeper fantasy API
//!
//! [`SleeperClient`] fronts the public Sleeper REST API with a TTL cache
//! whose lifetime depends on the kind of data, and retries rate-limited
//! requests with exponential backoff.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod retry;
pub mod tasks;

pub use cache::{DataCategory, TtlContext, TtlPolicy};
pub use client::{Endpoint, Fetched, SeasonType, SleeperClient};
pub use config::ClientConfig;
pub use error::{ErrorKind, Result, SleeperError};
pub use tasks::spawn_cleanup_task;
