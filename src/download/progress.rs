//! Throttled progress accounting for streamed downloads.
//!
//! Reporting every chunk of a multi-gigabyte transfer would flood the
//! consumer, so [`ProgressTracker`] only emits when progress advanced by a
//! full percentage point (known length) or a full MiB (unknown length).

use super::DownloadUpdate;
use super::constants::{INDETERMINATE_REPORT_BYTES, PROGRESS_STEP_PERCENT};

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Renders a byte count with binary-prefix units for display.
///
/// # Example
///
/// ```
/// use relay_core::download::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} bytes")
    } else if value < MIB {
        format!("{:.1} KB", value / KIB)
    } else if value < GIB {
        format!("{:.1} MB", value / MIB)
    } else {
        format!("{:.2} GB", value / GIB)
    }
}

/// Decides which chunks of a download produce a [`DownloadUpdate`].
///
/// Determinate mode (declared length > 0): emitted fractions are strictly
/// increasing, at least one percentage point apart, and end at exactly 1.0
/// once [`finish`](Self::finish) is called. Indeterminate mode: one update
/// per MiB accumulated since the previous one.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_bytes: u64,
    bytes_received: u64,
    last_reported_bytes: u64,
    unreported_bytes: u64,
    reached_end: bool,
}

impl ProgressTracker {
    /// Creates a tracker; `None` or `Some(0)` selects indeterminate mode.
    #[must_use]
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            total_bytes: total_bytes.unwrap_or(0),
            bytes_received: 0,
            last_reported_bytes: 0,
            unreported_bytes: 0,
            reached_end: false,
        }
    }

    /// Whether the declared length is known.
    #[must_use]
    pub fn is_determinate(&self) -> bool {
        self.total_bytes > 0
    }

    /// Total bytes seen so far.
    #[must_use]
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Accounts for one received chunk, returning an update if one is due.
    pub fn record(&mut self, chunk_len: usize) -> Option<DownloadUpdate> {
        let chunk_len = u64::try_from(chunk_len).unwrap_or(u64::MAX);
        self.bytes_received = self.bytes_received.saturating_add(chunk_len);

        if self.is_determinate() {
            self.record_determinate()
        } else {
            self.record_indeterminate(chunk_len)
        }
    }

    /// Returns the closing `Progress(1.0)` if it has not been emitted yet.
    ///
    /// Only determinate downloads get one; calling it again returns `None`.
    pub fn finish(&mut self) -> Option<DownloadUpdate> {
        if !self.is_determinate() || self.reached_end {
            return None;
        }
        self.reached_end = true;
        self.last_reported_bytes = self.total_bytes;
        Some(DownloadUpdate::Progress {
            fraction: 1.0,
            info: self.determinate_info(self.bytes_received),
        })
    }

    fn record_determinate(&mut self) -> Option<DownloadUpdate> {
        if self.reached_end {
            return None;
        }

        let effective = self.bytes_received.min(self.total_bytes);
        let advanced = effective.saturating_sub(self.last_reported_bytes);
        // advanced / total >= step / 100, kept in integers to avoid float drift.
        if u128::from(advanced) * 100
            < u128::from(self.total_bytes) * u128::from(PROGRESS_STEP_PERCENT)
        {
            return None;
        }

        self.last_reported_bytes = effective;
        if effective == self.total_bytes {
            self.reached_end = true;
        }

        Some(DownloadUpdate::Progress {
            fraction: self.fraction_of(effective),
            info: self.determinate_info(effective),
        })
    }

    fn record_indeterminate(&mut self, chunk_len: u64) -> Option<DownloadUpdate> {
        self.unreported_bytes = self.unreported_bytes.saturating_add(chunk_len);
        if self.unreported_bytes < INDETERMINATE_REPORT_BYTES {
            return None;
        }

        self.unreported_bytes = 0;
        Some(DownloadUpdate::Indeterminate {
            info: format!("{} downloaded", format_bytes(self.bytes_received)),
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn fraction_of(&self, bytes: u64) -> f64 {
        if bytes >= self.total_bytes {
            1.0
        } else {
            bytes as f64 / self.total_bytes as f64
        }
    }

    fn determinate_info(&self, bytes: u64) -> String {
        format!(
            "{} of {}",
            format_bytes(bytes),
            format_bytes(self.total_bytes)
        )
    }
}
