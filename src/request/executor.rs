//! Single request execution with latency measurement.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::{debug, info, instrument, warn};

use super::constants::REQUEST_TIMEOUT_SECS;
use super::json::pretty_print_json;
use super::{Request, Response};
use crate::error::{ErrorKind, classify_transport_error};
use crate::transport::{parse_request_url, request_client};

/// Issues one HTTP request at a time and normalizes the result.
///
/// Cheap to clone; clones share the underlying connection pool. Nothing is
/// retried, cached, or remembered between executions.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    /// Creates an executor with the fixed 15 second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates an executor with a custom whole-exchange timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client =
            request_client(timeout).expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Executes `request` and returns the normalized response.
    ///
    /// Latency covers dispatch through receipt of the complete body. Any
    /// status code, including 4xx and 5xx, is a successful execution.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidUrl`] for a URL that does not validate, and
    /// the classified [`ErrorKind`] for any transport failure.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: &Request) -> Result<Response, ErrorKind> {
        let url = parse_request_url(&request.url)?;

        let mut builder = self.client.request(request.method.to_reqwest(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.outgoing_body() {
            builder = builder.body(body.to_string());
        }

        debug!(headers = request.headers.len(), "dispatching request");
        let started = Instant::now();

        let response = builder.send().await.map_err(|error| {
            let kind = classify_transport_error(&error);
            warn!(error = %error, kind = ?kind, "request failed");
            kind
        })?;

        let status_code = response.status().as_u16();
        let headers = normalize_headers(response.headers());

        let raw_bytes = response.bytes().await.map_err(|error| {
            let kind = classify_transport_error(&error);
            warn!(error = %error, kind = ?kind, "reading response body failed");
            kind
        })?;
        let latency_millis = started.elapsed().as_secs_f64() * 1000.0;

        let body = pretty_print_json(std::str::from_utf8(&raw_bytes).unwrap_or_default());
        let raw_bytes = raw_bytes.to_vec();

        info!(
            status = status_code,
            latency_ms = latency_millis,
            bytes = raw_bytes.len(),
            "request complete"
        );

        Ok(Response {
            status_code,
            latency_millis,
            headers,
            body,
            raw_bytes,
        })
    }
}

/// Flattens a header map, letting the last value of a repeated name win.
///
/// Values that are not visible ASCII text are skipped.
fn normalize_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut normalized = HashMap::with_capacity(headers.keys_len());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            normalized.insert(name.as_str().to_string(), value.to_string());
        }
    }
    normalized
}
