//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Upstream base URL, without trailing slash
    pub base_url: String,
    /// If set, replaces the TTL of every cache category
    pub cache_ttl_override: Option<Duration>,
    /// Retries permitted after the first attempt
    pub max_retries: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Backoff base delay
    pub retry_base_delay: Duration,
    /// Backoff delay ceiling
    pub retry_max_delay: Duration,
    /// Client-side request budget per minute, 0 disables pacing
    pub requests_per_minute: u32,
    /// Minimum spacing between request starts, zero disables it
    pub min_request_interval: Duration,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Whether connect/timeout failures go through the retry loop
    pub retry_transport_errors: bool,
}

impl ClientConfig {
    /// Creates a new ClientConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SLEEPER_BASE_URL` - Upstream base URL (default: https://api.sleeper.app/v1)
    /// - `SLEEPER_CACHE_TTL` - TTL override in seconds for all categories (default: unset)
    /// - `SLEEPER_MAX_RETRIES` - Retries after the first attempt (default: 3)
    /// - `SLEEPER_TIMEOUT_SECS` - Per-request timeout (default: 30)
    /// - `SLEEPER_RETRY_BASE_DELAY_MS` - Backoff base delay (default: 1000)
    /// - `SLEEPER_RETRY_MAX_DELAY_SECS` - Backoff ceiling (default: 60)
    /// - `SLEEPER_REQUESTS_PER_MINUTE` - Pacing budget, 0 disables (default: 1000)
    /// - `SLEEPER_MIN_REQUEST_INTERVAL_MS` - Spacing between request starts (default: 0)
    /// - `SLEEPER_CACHE_MAX_ENTRIES` - Cache capacity (default: 10000)
    /// - `SLEEPER_RETRY_TRANSPORT_ERRORS` - Retry connect/timeout errors (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            base_url: lookup("SLEEPER_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            cache_ttl_override: parse("SLEEPER_CACHE_TTL").map(Duration::from_secs),
            max_retries: parse("SLEEPER_MAX_RETRIES")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.max_retries),
            request_timeout: parse("SLEEPER_TIMEOUT_SECS")
                .filter(|v| *v > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            retry_base_delay: parse("SLEEPER_RETRY_BASE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            retry_max_delay: parse("SLEEPER_RETRY_MAX_DELAY_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_max_delay),
            requests_per_minute: parse("SLEEPER_REQUESTS_PER_MINUTE")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.requests_per_minute),
            min_request_interval: parse("SLEEPER_MIN_REQUEST_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_request_interval),
            cache_max_entries: parse("SLEEPER_CACHE_MAX_ENTRIES")
                .filter(|v| *v > 0)
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(defaults.cache_max_entries),
            retry_transport_errors: lookup("SLEEPER_RETRY_TRANSPORT_ERRORS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.retry_transport_errors),
        }
    }

    /// Config pointed at a different upstream, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl_override: None,
            max_retries: 3,
            request_timeout: Duration::from_secs(30),
            retry_base_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(60),
            requests_per_minute: 1000,
            min_request_interval: Duration::ZERO,
            cache_max_entries: 10_000,
            retry_transport_errors: false,
        }
    }
}
