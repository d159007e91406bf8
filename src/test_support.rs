//! Mock-server helper for unit tests.
//!
//! Integration tests carry the full socket guard in `tests/support`; unit
//! tests only need to start a server or bow out.

use std::net::TcpListener;

use wiremock::MockServer;

/// Starts a mock server, or returns `None` when localhost cannot be bound.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_err() {
        eprintln!("[unit] localhost sockets unavailable; skipping mock-server test");
        return None;
    }
    Some(MockServer::start().await)
}
