//! Streaming GET downloads that report throttled progress.

use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::constants::DOWNLOAD_TIMEOUT_SECS;
use super::progress::ProgressTracker;
use super::update::DownloadUpdate;
use crate::error::{ErrorKind, classify_transport_error};
use crate::transport::{download_client, parse_request_url};

/// Lazy, finite stream of updates for one download.
///
/// Nothing is sent until the stream is first polled. Dropping it aborts the
/// transfer.
pub type DownloadUpdates = BoxStream<'static, DownloadUpdate>;

/// Response body reduced to chunk lengths; the bytes themselves are not kept.
type BodyStream = BoxStream<'static, reqwest::Result<usize>>;

/// Issues GET requests and turns their bodies into [`DownloadUpdates`].
#[derive(Debug, Clone)]
pub struct DownloadStreamer {
    client: Client,
}

impl Default for DownloadStreamer {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadStreamer {
    /// Creates a streamer with 15 second connect and read timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
    }

    /// Creates a streamer with custom connect and per-read timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = download_client(timeout)
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Starts a lazy download of `url`.
    ///
    /// The stream yields throttled `Progress` or `Indeterminate` updates and
    /// then exactly one `Finished` or `Error`. Once `cancel` fires, the stream
    /// ends without a terminal update; updates already yielded stay valid.
    pub fn stream(&self, url: &str, cancel: CancellationToken) -> DownloadUpdates {
        let state = StreamState::Pending {
            client: self.client.clone(),
            url: url.to_string(),
            cancel,
        };
        stream::unfold(state, next_update).boxed()
    }
}

enum StreamState {
    Pending {
        client: Client,
        url: String,
        cancel: CancellationToken,
    },
    Receiving {
        body: BodyStream,
        tracker: ProgressTracker,
        cancel: CancellationToken,
    },
    Closing {
        cancel: CancellationToken,
    },
    Done,
}

/// Advances the download until the next update is due.
///
/// Every iteration checks the token first, and every await races it, so a
/// cancelled download stops at the next suspension point without reporting.
async fn next_update(mut state: StreamState) -> Option<(DownloadUpdate, StreamState)> {
    loop {
        state = match state {
            StreamState::Pending {
                client,
                url,
                cancel,
            } => match open(&client, &url, &cancel).await {
                Opened::Streaming(body, tracker) => StreamState::Receiving {
                    body,
                    tracker,
                    cancel,
                },
                Opened::Failed(kind) => {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    return Some((DownloadUpdate::error(kind), StreamState::Done));
                }
                Opened::Cancelled => {
                    debug!(url = %url, "download cancelled before response");
                    return None;
                }
            },
            StreamState::Receiving {
                mut body,
                mut tracker,
                cancel,
            } => {
                if cancel.is_cancelled() {
                    debug!(bytes = tracker.bytes_received(), "download cancelled");
                    return None;
                }

                let chunk = tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        debug!(bytes = tracker.bytes_received(), "download cancelled mid-chunk");
                        return None;
                    }
                    chunk = body.next() => chunk,
                };

                match chunk {
                    Some(Ok(chunk_len)) => {
                        let update = tracker.record(chunk_len);
                        let next = StreamState::Receiving {
                            body,
                            tracker,
                            cancel,
                        };
                        match update {
                            Some(update) => return Some((update, next)),
                            None => next,
                        }
                    }
                    Some(Err(error)) => {
                        if cancel.is_cancelled() {
                            return None;
                        }
                        let kind = classify_transport_error(&error);
                        warn!(
                            error = %error,
                            kind = ?kind,
                            bytes = tracker.bytes_received(),
                            "download interrupted"
                        );
                        return Some((DownloadUpdate::error(kind), StreamState::Done));
                    }
                    None => {
                        info!(bytes = tracker.bytes_received(), "download complete");
                        match tracker.finish() {
                            Some(update) => return Some((update, StreamState::Closing { cancel })),
                            None => StreamState::Closing { cancel },
                        }
                    }
                }
            }
            StreamState::Closing { cancel } => {
                if cancel.is_cancelled() {
                    return None;
                }
                return Some((DownloadUpdate::Finished, StreamState::Done));
            }
            StreamState::Done => return None,
        };
    }
}

enum Opened {
    Streaming(BodyStream, ProgressTracker),
    Failed(ErrorKind),
    Cancelled,
}

#[instrument(skip(client, cancel))]
async fn open(client: &Client, url: &str, cancel: &CancellationToken) -> Opened {
    if cancel.is_cancelled() {
        return Opened::Cancelled;
    }

    let parsed = match parse_request_url(url) {
        Ok(parsed) => parsed,
        Err(kind) => return Opened::Failed(kind),
    };

    debug!("sending download request");
    let sent = tokio::select! {
        biased;
        () = cancel.cancelled() => return Opened::Cancelled,
        sent = client.get(parsed).send() => sent,
    };

    let response = match sent {
        Ok(response) => response,
        Err(error) => {
            let kind = classify_transport_error(&error);
            warn!(error = %error, kind = ?kind, "download request failed");
            return Opened::Failed(kind);
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "download rejected by server");
        return Opened::Failed(ErrorKind::from_status(status.as_u16()));
    }

    let total_bytes = response.content_length();
    debug!(total_bytes = ?total_bytes, "download response received");

    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map(|bytes| bytes.len()))
        .boxed();
    Opened::Streaming(body, ProgressTracker::new(total_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_yields_single_error() {
        let streamer = DownloadStreamer::new();
        let updates: Vec<DownloadUpdate> = streamer
            .stream("not a url", CancellationToken::new())
            .collect()
            .await;
        assert_eq!(updates, vec![DownloadUpdate::error(ErrorKind::InvalidUrl)]);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_poll_yields_nothing() {
        let streamer = DownloadStreamer::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let updates: Vec<DownloadUpdate> = streamer
            .stream("http://127.0.0.1:9/never", cancel)
            .collect()
            .await;
        assert!(updates.is_empty(), "expected silence, got {updates:?}");
    }

    #[tokio::test]
    async fn test_stream_is_lazy_until_polled() {
        let streamer = DownloadStreamer::new();
        let cancel = CancellationToken::new();
        let updates = streamer.stream("http://127.0.0.1:9/never", cancel.clone());
        cancel.cancel();
        let collected: Vec<DownloadUpdate> = updates.collect().await;
        assert!(collected.is_empty());
    }
}
