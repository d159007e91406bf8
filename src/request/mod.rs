//! Request and response model plus single-request execution.
//!
//! A [`RequestTemplate`] is what a user edits: it may contain `{{variable}}`
//! placeholders and a free-form header block. Resolving it against an
//! [`Environment`] yields an immutable [`Request`], which the
//! [`RequestExecutor`] turns into a [`Response`] or an [`ErrorKind`].
//!
//! [`ErrorKind`]: crate::ErrorKind

mod constants;
mod executor;
mod json;
mod response;

pub use constants::REQUEST_TIMEOUT_SECS;
pub use executor::RequestExecutor;
pub use json::pretty_print_json;
pub use response::{LatencyRating, Response};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::environment::{Environment, substitute};
use crate::parser::parse_headers;

/// HTTP methods the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// All supported methods, in display order.
    pub const ALL: [Self; 5] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    /// Upper-case method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request body is sent with this method.
    #[must_use]
    pub fn allows_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a supported method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0} (expected GET, POST, PUT, PATCH or DELETE)")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnsupportedMethod(trimmed.to_string()))
    }
}

/// A fully-resolved request, immutable for a single execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Target URL (trimmed and validated at execution time).
    pub url: String,
    /// Header map attached verbatim.
    pub headers: HashMap<String, String>,
    /// Optional payload; only sent for POST, PUT and PATCH.
    pub body: Option<String>,
}

impl Request {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Adds a header, replacing any previous value for the same name.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The body that will actually go on the wire, if any.
    #[must_use]
    pub fn outgoing_body(&self) -> Option<&str> {
        self.body
            .as_deref()
            .filter(|body| self.method.allows_body() && !body.is_empty())
    }
}

/// A request as the user edits it, before environment substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTemplate {
    /// HTTP method.
    pub method: Method,
    /// URL, possibly containing `{{variable}}` placeholders.
    pub url: String,
    /// Free-form `Key: Value` header block.
    pub raw_headers: String,
    /// Body text, possibly containing placeholders.
    pub body: String,
    /// Bearer token; when non-blank it becomes an `Authorization` header.
    pub auth_token: String,
}

impl RequestTemplate {
    /// Creates a template with no headers, body, or token.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the raw header block.
    #[must_use]
    pub fn with_raw_headers(mut self, raw_headers: impl Into<String>) -> Self {
        self.raw_headers = raw_headers.into();
        self
    }

    /// Sets the body template.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the bearer token template.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Substitutes variables everywhere and parses the header block.
    ///
    /// A non-blank token is sent as `Authorization: Bearer <token>` and takes
    /// precedence over an `Authorization` line in the header block.
    #[must_use]
    pub fn resolve(&self, environment: Option<&Environment>) -> Request {
        let url = substitute(&self.url, environment);
        let mut headers = parse_headers(&substitute(&self.raw_headers, environment));

        let token = substitute(&self.auth_token, environment);
        let token = token.trim();
        if !token.is_empty() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let body = substitute(&self.body, environment);

        Request {
            method: self.method,
            url,
            headers,
            body: (!body.is_empty()).then_some(body),
        }
    }
}
