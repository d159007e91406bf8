//! Constants for the download module (timeouts, progress throttling).

/// Connect and per-read timeout for streamed downloads (15 seconds).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 15;

/// Bytes that must accumulate between two indeterminate updates (1 MiB).
pub const INDETERMINATE_REPORT_BYTES: u64 = 1_048_576;

/// Minimum advance, in percentage points, between two progress updates.
pub const PROGRESS_STEP_PERCENT: u64 = 1;
