//! Single-flight orchestration of requests and downloads.
//!
//! A [`RequestSession`] owns at most one in-flight request and, independently,
//! at most one in-flight download. Starting a new operation of a kind cancels
//! the previous one of that kind first, so a superseded result can never
//! overwrite a newer one.
//!
//! # Concurrency Model
//!
//! - Each operation runs on the caller's task and races its cancellation
//!   token at every suspension point
//! - The only shared mutable state is one token slot per kind
//! - Cancellation is silent: a cancelled operation publishes nothing
//! - Timeouts are not cancellation and surface as `ErrorKind::Timeout`
//!
//! # Example
//!
//! ```no_run
//! use relay_core::{Environment, Method, RequestSession, RequestTemplate};
//!
//! # async fn example() {
//! let session = RequestSession::new();
//! let env = Environment::new("1", "Local").with_variable("path", "items");
//! let template = RequestTemplate::new(Method::Get, "https://example.test/{{path}}")
//!     .with_raw_headers("Accept: application/json");
//!
//! match session.perform_request(&template, Some(&env)).await {
//!     Some(Ok(response)) => println!("{} in {:.0} ms", response.status_code, response.latency_millis),
//!     Some(Err(error)) => eprintln!("{error}"),
//!     None => {} // superseded or cancelled
//! }
//! # }
//! ```

mod slot;

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, instrument};

use crate::download::{DownloadStreamer, DownloadUpdate, DownloadUpdates};
use crate::environment::{Environment, substitute};
use crate::error::ErrorKind;
use crate::request::{RequestExecutor, RequestTemplate, Response};
use slot::FlightSlot;

/// Owns the in-flight request and download handles.
///
/// Share it behind an `Arc` to start and cancel operations from different
/// tasks.
#[derive(Debug, Default)]
pub struct RequestSession {
    executor: RequestExecutor,
    streamer: DownloadStreamer,
    request_slot: FlightSlot,
    download_slot: Arc<FlightSlot>,
}

impl RequestSession {
    /// Creates a session with the default 15 second timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session whose request deadline and download connect/read
    /// timeouts are `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            executor: RequestExecutor::with_timeout(timeout),
            streamer: DownloadStreamer::with_timeout(timeout),
            request_slot: FlightSlot::default(),
            download_slot: Arc::default(),
        }
    }

    /// Resolves `template` against `environment` and executes it.
    ///
    /// Any request already in flight is cancelled first. Returns `None` when
    /// this request is itself cancelled or superseded before its result is
    /// published; otherwise the response or the classified error.
    #[instrument(skip(self, template, environment), fields(method = %template.method))]
    pub async fn perform_request(
        &self,
        template: &RequestTemplate,
        environment: Option<&Environment>,
    ) -> Option<Result<Response, ErrorKind>> {
        let request = template.resolve(environment);
        let (flight, superseded) = self.request_slot.begin();
        if superseded {
            debug!("superseded in-flight request");
        }
        debug!(generation = flight.generation(), url = %request.url, "request started");

        let token = flight.token();
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            outcome = self.executor.execute(&request) => Some(outcome),
        };

        // Publication step: a cancelled flight reports nothing.
        if token.is_cancelled() {
            debug!(generation = flight.generation(), "discarding cancelled request");
            return None;
        }
        self.request_slot.finish(&flight);
        outcome
    }

    /// Resolves `url_template` and returns the lazy update stream.
    ///
    /// Any download already in flight is cancelled first. The transfer only
    /// progresses while the returned stream is polled; dropping it, or calling
    /// [`cancel_current_download`](Self::cancel_current_download), stops it.
    #[instrument(skip(self, url_template, environment))]
    pub fn start_download(
        &self,
        url_template: &str,
        environment: Option<&Environment>,
    ) -> DownloadUpdates {
        let url = substitute(url_template, environment);
        let (flight, superseded) = self.download_slot.begin();
        if superseded {
            debug!("superseded in-flight download");
        }
        debug!(generation = flight.generation(), url = %url, "download started");

        let updates = self.streamer.stream(&url, flight.token().clone());
        // Free the slot once the stream is exhausted, whatever ended it.
        let slot = Arc::clone(&self.download_slot);
        let release = stream::once(async move { slot.finish(&flight) })
            .filter_map(|()| async { None::<DownloadUpdate> });
        updates.chain(release).boxed()
    }

    /// Cancels the in-flight request, if any. Idempotent.
    pub fn cancel_current_request(&self) {
        if self.request_slot.cancel() {
            debug!("cancelled in-flight request");
        }
    }

    /// Cancels the in-flight download, if any. Idempotent.
    pub fn cancel_current_download(&self) {
        if self.download_slot.cancel() {
            debug!("cancelled in-flight download");
        }
    }
}
