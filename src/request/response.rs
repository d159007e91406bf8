//! Normalized response returned by a successful execution.

use std::collections::HashMap;
use std::fmt;

/// Outcome of a completed HTTP exchange, whatever its status code.
///
/// A 404 or 500 is still a `Response`; only transport failures become an
/// [`ErrorKind`](crate::ErrorKind).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Wall time from dispatch until the full body was received.
    pub latency_millis: f64,
    /// Response headers; on duplicate names the last value wins.
    pub headers: HashMap<String, String>,
    /// UTF-8 body text, pretty-printed when it is JSON.
    pub body: String,
    /// Payload exactly as received, for images and other non-text content.
    pub raw_bytes: Vec<u8>,
}

impl Response {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The `content-type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the payload is textual and `body` is meaningful.
    ///
    /// Responses without a content type are treated as text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.content_type().is_none_or(|content_type| {
            let content_type = content_type.to_ascii_lowercase();
            content_type.starts_with("text/")
                || content_type.contains("json")
                || content_type.contains("xml")
                || content_type.contains("javascript")
                || content_type.contains("x-www-form-urlencoded")
        })
    }

    /// Speed bucket for the measured latency.
    #[must_use]
    pub fn latency_rating(&self) -> LatencyRating {
        LatencyRating::from_millis(self.latency_millis)
    }
}

/// Coarse rating of how fast an exchange felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LatencyRating {
    /// Under 200 ms.
    Fast,
    /// 200 ms up to 600 ms.
    Good,
    /// 600 ms up to 1.2 s.
    Slow,
    /// 1.2 s or more.
    VerySlow,
}

impl LatencyRating {
    /// Buckets a latency in milliseconds.
    #[must_use]
    pub fn from_millis(millis: f64) -> Self {
        if millis < 200.0 {
            Self::Fast
        } else if millis < 600.0 {
            Self::Good
        } else if millis < 1200.0 {
            Self::Slow
        } else {
            Self::VerySlow
        }
    }

    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Good => "good",
            Self::Slow => "slow",
            Self::VerySlow => "very slow",
        }
    }
}

impl fmt::Display for LatencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
