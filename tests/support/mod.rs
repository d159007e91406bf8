//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one connection with a close-delimited body (no `Content-Length`).
///
/// `chunks` are written in order with `pause` between them; the connection is
/// closed afterwards unless `hang` is set, in which case it stays open.
pub async fn serve_unsized_body(chunks: Vec<Vec<u8>>, pause: Duration, hang: bool) -> SocketAddr {
    serve_raw_body(None, chunks, pause, hang).await
}

/// Like [`serve_unsized_body`], but announces `content_length` up front
/// whether or not that many bytes are actually sent.
pub async fn serve_raw_body(
    content_length: Option<u64>,
    chunks: Vec<Vec<u8>>,
    pause: Duration,
    hang: bool,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind raw test server");
    let addr = listener.local_addr().expect("raw server address");

    let mut head = String::from(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n",
    );
    if let Some(length) = content_length {
        head.push_str(&format!("Content-Length: {length}\r\n"));
    }
    head.push_str("\r\n");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0_u8; 4096];
        let _ = socket.read(&mut request).await;

        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for chunk in chunks {
            if socket.write_all(&chunk).await.is_err() {
                return;
            }
            let _ = socket.flush().await;
            tokio::time::sleep(pause).await;
        }
        if hang {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        let _ = socket.shutdown().await;
    });

    addr
}

/// Returns a localhost address with nothing listening on it.
pub fn closed_port_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe socket");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr
}
