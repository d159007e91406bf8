//! Construction of the underlying HTTP clients and URL validation.
//!
//! Both clients are ephemeral: reqwest keeps no response cache, and no cookie
//! store is attached, so nothing carries over between executions.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::error::ErrorKind;
use crate::user_agent;

/// Trims and validates a request URL.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidUrl`] when the trimmed text does not parse, is
/// not `http`/`https`, or has no host.
pub fn parse_request_url(raw: &str) -> Result<Url, ErrorKind> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|error| {
        debug!(url = %trimmed, %error, "rejecting unparseable URL");
        ErrorKind::InvalidUrl
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        debug!(url = %trimmed, scheme = url.scheme(), "rejecting non-HTTP URL");
        return Err(ErrorKind::InvalidUrl);
    }

    Ok(url)
}

/// Client for single request/response exchanges with a whole-exchange deadline.
pub(crate) fn request_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    base_builder().timeout(timeout).gzip(true).build()
}

/// Client for streamed downloads.
///
/// A whole-transfer deadline would abort large downloads, so the bound applies
/// to connecting and to each read instead. Transparent gzip decoding is off so
/// the declared `Content-Length` matches the bytes counted.
pub(crate) fn download_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    base_builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .gzip(false)
        .build()
}

fn base_builder() -> ClientBuilder {
    Client::builder().user_agent(user_agent::default_user_agent())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_url_trims_whitespace() {
        let url = parse_request_url("  https://example.test/items \n").unwrap();
        assert_eq!(url.as_str(), "https://example.test/items");
    }

    #[test]
    fn test_parse_request_url_rejects_blank_input() {
        assert_eq!(parse_request_url("   "), Err(ErrorKind::InvalidUrl));
    }

    #[test]
    fn test_parse_request_url_rejects_missing_scheme() {
        assert_eq!(
            parse_request_url("example.test/items"),
            Err(ErrorKind::InvalidUrl)
        );
    }

    #[test]
    fn test_parse_request_url_rejects_non_http_scheme() {
        assert_eq!(
            parse_request_url("ftp://example.test/file"),
            Err(ErrorKind::InvalidUrl)
        );
        assert_eq!(
            parse_request_url("mailto:someone@example.test"),
            Err(ErrorKind::InvalidUrl)
        );
    }

    #[test]
    fn test_clients_build_with_default_timeouts() {
        assert!(request_client(Duration::from_secs(15)).is_ok());
        assert!(download_client(Duration::from_secs(15)).is_ok());
    }
}
