//! Constants for request execution.

/// Fixed bound on a single request/response exchange (15 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
