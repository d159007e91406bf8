//! Events produced while streaming a download.

use std::fmt;

/// One step of a download as seen by the consumer.
///
/// A stream of updates ends with exactly one [`Finished`](Self::Finished) or
/// [`Error`](Self::Error), unless it was cancelled, in which case it simply
/// stops.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadUpdate {
    /// Fraction complete (0.0 to 1.0) when the total size is known.
    Progress {
        /// Completed share of the declared length.
        fraction: f64,
        /// Display text such as `"1.5 MB of 10.0 MB"`.
        info: String,
    },
    /// Bytes received so far when the total size is unknown.
    Indeterminate {
        /// Display text such as `"3.0 MB downloaded"`.
        info: String,
    },
    /// The body was fully received.
    Finished,
    /// The download failed; carries a user-facing message.
    Error {
        /// Message describing the failure.
        message: String,
    },
}

impl DownloadUpdate {
    /// Whether this update ends the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Error { .. })
    }

    pub(crate) fn error(message: impl fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_only_finished_and_error_are_terminal() {
        assert!(DownloadUpdate::Finished.is_terminal());
        assert!(DownloadUpdate::error(ErrorKind::Timeout).is_terminal());
        assert!(
            !DownloadUpdate::Progress {
                fraction: 0.5,
                info: String::new()
            }
            .is_terminal()
        );
        assert!(
            !DownloadUpdate::Indeterminate {
                info: String::new()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_error_update_uses_error_kind_message() {
        assert_eq!(
            DownloadUpdate::error(ErrorKind::ServerError(404)),
            DownloadUpdate::Error {
                message: "server error (code 404)".to_string()
            }
        );
    }
}
