//! Relay Core Library
//!
//! This library is the request-execution core of an interactive HTTP client:
//! it issues requests, measures latency, classifies transport failures into a
//! stable error taxonomy, substitutes environment variables into request
//! templates, and streams large downloads with throttled progress reporting
//! and cooperative cancellation.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Parsing of free-form `Key: Value` header text
//! - [`environment`] - Environments and `{{variable}}` substitution
//! - [`error`] - The [`ErrorKind`] taxonomy and transport error classification
//! - [`request`] - Request/response model and single-request execution
//! - [`download`] - Streamed downloads with throttled progress updates
//! - [`session`] - Single-flight orchestration with silent cancellation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod environment;
pub mod error;
pub mod parser;
pub mod request;
pub mod session;
#[cfg(test)]
pub mod test_support;
pub mod transport;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{DownloadStreamer, DownloadUpdate, DownloadUpdates, format_bytes};
pub use environment::{Environment, substitute};
pub use error::{ErrorKind, classify_transport_error};
pub use parser::parse_headers;
pub use request::{
    LatencyRating, Method, REQUEST_TIMEOUT_SECS, Request, RequestExecutor, RequestTemplate,
    Response, pretty_print_json,
};
pub use session::RequestSession;
pub use transport::parse_request_url;
