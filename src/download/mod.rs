//! Streaming downloads with throttled progress reporting.
//!
//! [`DownloadStreamer`] consumes a response body chunk by chunk without
//! keeping it, yielding [`DownloadUpdate`]s a consumer can render.
//!
//! # Features
//!
//! - Lazy: no request is sent until the update stream is polled
//! - Determinate progress in steps of at least one percentage point
//! - Indeterminate updates every MiB when the length is unknown
//! - Cooperative cancellation through a `CancellationToken`
//!
//! # Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use relay_core::download::{DownloadStreamer, DownloadUpdate};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let streamer = DownloadStreamer::new();
//! let mut updates = streamer.stream("https://example.com/big.iso", CancellationToken::new());
//! while let Some(update) = updates.next().await {
//!     match update {
//!         DownloadUpdate::Progress { fraction, info } => println!("{:.0}% {info}", fraction * 100.0),
//!         DownloadUpdate::Indeterminate { info } => println!("{info}"),
//!         DownloadUpdate::Finished => println!("done"),
//!         DownloadUpdate::Error { message } => eprintln!("{message}"),
//!     }
//! }
//! # }
//! ```

mod constants;
mod progress;
mod streamer;
mod update;

pub use constants::{DOWNLOAD_TIMEOUT_SECS, INDETERMINATE_REPORT_BYTES, PROGRESS_STEP_PERCENT};
pub use progress::{ProgressTracker, format_bytes};
pub use streamer::{DownloadStreamer, DownloadUpdates};
pub use update::DownloadUpdate;
