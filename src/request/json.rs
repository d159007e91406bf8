//! Best-effort JSON pretty-printing for response bodies.

use serde_json::Value;
use tracing::trace;

/// Re-indents `text` with two spaces if it is valid JSON.
///
/// Anything that fails to parse is returned unchanged; this never errors.
/// Object key order is kept as received. Applying it to its own output
/// yields the same string.
///
/// # Example
///
/// ```
/// use relay_core::request::pretty_print_json;
///
/// assert_eq!(pretty_print_json(r#"{"id":1}"#), "{\n  \"id\": 1\n}");
/// assert_eq!(pretty_print_json("not json"), "not json");
/// ```
#[must_use]
pub fn pretty_print_json(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return text.to_string();
    };

    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => pretty,
        Err(error) => {
            trace!(%error, "JSON re-serialization failed, keeping raw text");
            text.to_string()
        }
    }
}
