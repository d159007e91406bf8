//! Error taxonomy for request execution and downloads.
//!
//! Every failure detected while executing a request or streaming a download
//! is reported as exactly one [`ErrorKind`]. Raw transport errors never leave
//! the library; they are mapped by [`classify_transport_error`].

mod classify;

pub use classify::{classify_transport_error, diagnostic_text};

use thiserror::Error;

/// Closed set of failures surfaced to callers.
///
/// The `Display` output is the stable, user-facing message for each kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The URL is empty, malformed, or not an HTTP(S) URL.
    #[error("invalid URL format")]
    InvalidUrl,

    /// The transport deadline elapsed before the exchange completed.
    #[error("the server took too long to respond (timeout)")]
    Timeout,

    /// No network path, or the connection dropped mid-flight.
    #[error("no internet connection, check your network")]
    NoInternet,

    /// The host could not be reached or resolved.
    #[error("server is down or the address is wrong (connection refused)")]
    ServerDown,

    /// A status code is known but no usable payload was received.
    ///
    /// Request execution never produces this: a 5xx response is returned as a
    /// normal [`Response`](crate::Response). Downloads use it for non-success
    /// statuses, where the body is not the requested file.
    #[error("server error (code {0})")]
    ServerError(u16),

    /// Any other transport failure, carrying the original diagnostic text.
    #[error("{0}")]
    Unknown(String),
}

impl ErrorKind {
    /// Creates a `ServerError` for a known status code.
    #[must_use]
    pub fn from_status(code: u16) -> Self {
        Self::ServerError(code)
    }

    /// Creates an `Unknown` error from any displayable diagnostic.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }
}
