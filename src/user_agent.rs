//! Shared User-Agent string for request and download traffic.

/// Default User-Agent sent unless the caller's headers set their own.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("relay/{version} (http-client)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_tool_and_version() {
        let ua = default_user_agent();
        assert_eq!(ua, format!("relay/{} (http-client)", env!("CARGO_PKG_VERSION")));
        assert!(!ua.contains("://"), "UA must not carry a project URL: {ua}");
    }
}
