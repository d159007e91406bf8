//! Parsing of free-form `Key: Value` header text.

use std::collections::HashMap;

/// Parses newline-delimited `Key: Value` lines into a header map.
///
/// Each line is split on its first colon only, so values may themselves
/// contain colons (`Host: localhost:8080`). Keys and values are trimmed.
/// Lines without a colon, or with an empty key, are skipped. When a key
/// repeats, the later line wins.
///
/// # Example
///
/// ```
/// use relay_core::parser::parse_headers;
///
/// let headers = parse_headers("Accept: application/json\nA: 1\nA: 2");
/// assert_eq!(headers["Accept"], "application/json");
/// assert_eq!(headers["A"], "2");
/// ```
#[must_use]
pub fn parse_headers(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        headers.insert(key.to_string(), value.trim().to_string());
    }

    headers
}
