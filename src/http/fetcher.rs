//! HTTP Fetcher
//!
//! One outbound GET per call. Classifies the response and decodes it into
//! the endpoint's payload type; never retries on its own.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, SleeperError};
use crate::models::Payload;
use crate::retry::{RequestOutcome, RetryableFailure};

const USER_AGENT: &str = concat!("sleeper-core/", env!("CARGO_PKG_VERSION"));

// == Status Class ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// 429 and 5xx
    Retryable,
    NotFound,
    /// Any other non-success status
    Rejected,
}

pub fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        StatusClass::Retryable
    } else if status == StatusCode::NOT_FOUND {
        StatusClass::NotFound
    } else {
        StatusClass::Rejected
    }
}

// == Decode ==
/// Decodes and validates a 2xx body.
///
/// A `null` body means absence unless the payload type maps it to an empty
/// collection. Structurally invalid bodies are never coerced.
pub fn decode_body<T: Payload>(endpoint: &str, body: &[u8]) -> Result<T> {
    let parsed: Option<T> =
        serde_json::from_slice(body).map_err(|e| SleeperError::malformed(endpoint, e))?;

    let value = match parsed {
        Some(value) => value,
        None => T::from_null().ok_or_else(|| SleeperError::NotFound(endpoint.to_string()))?,
    };

    value
        .validate()
        .map_err(|reason| SleeperError::malformed(endpoint, reason))?;

    if value.is_absent() {
        return Err(SleeperError::NotFound(endpoint.to_string()));
    }
    Ok(value)
}

// == HTTP Fetcher ==
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    retry_transport_errors: bool,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| SleeperError::InvalidRequest(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_transport_errors: config.retry_transport_errors,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Performs one attempt. `attempt` is the zero-based retry index and only
    /// feeds error context.
    pub async fn fetch<T: Payload>(
        &self,
        path: &str,
        query: &[(&str, String)],
        attempt: u32,
    ) -> RequestOutcome<T> {
        let url = self.url_for(path);
        debug!(%url, attempt, "upstream request");

        let response = match self.client.get(&url).query(query).send().await {
            Ok(response) => response,
            Err(err) => return self.transport_failure(path, err, attempt),
        };

        let status = response.status();
        match classify_status(status) {
            StatusClass::Success => {}
            StatusClass::Retryable => {
                return RequestOutcome::Retryable(RetryableFailure::Status {
                    endpoint: path.to_string(),
                    status: status.as_u16(),
                })
            }
            StatusClass::NotFound => {
                return RequestOutcome::Fatal(SleeperError::NotFound(path.to_string()))
            }
            StatusClass::Rejected => {
                return RequestOutcome::Fatal(SleeperError::UpstreamRejected {
                    endpoint: path.to_string(),
                    status: status.as_u16(),
                })
            }
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => return self.transport_failure(path, err, attempt),
        };

        match decode_body::<T>(path, &body) {
            Ok(value) => RequestOutcome::Success(value),
            Err(err) => RequestOutcome::Fatal(err),
        }
    }

    fn transport_failure<T>(
        &self,
        path: &str,
        err: reqwest::Error,
        attempt: u32,
    ) -> RequestOutcome<T> {
        let reason = if err.is_timeout() {
            format!("timed out: {err}")
        } else {
            err.to_string()
        };

        if self.retry_transport_errors && (err.is_timeout() || err.is_connect()) {
            RequestOutcome::Retryable(RetryableFailure::Transport {
                endpoint: path.to_string(),
                reason,
            })
        } else {
            RequestOutcome::Fatal(SleeperError::NetworkError {
                endpoint: path.to_string(),
                reason,
                attempts: attempt + 1,
            })
        }
    }
}
