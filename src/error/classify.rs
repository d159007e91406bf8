//! Maps transport failures onto [`ErrorKind`].
//!
//! Classification walks the whole `source()` chain: reqwest wraps hyper,
//! which wraps the underlying `std::io::Error`, and the useful signal is
//! usually a few levels down.

use std::error::Error as StdError;
use std::io;

use super::ErrorKind;

/// Message fragments hyper-util and the system resolver use for DNS failures.
const HOST_NOT_FOUND_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
];

/// Message fragments for connections that went away mid-exchange.
const CONNECTION_DROPPED_MARKERS: &[&str] = &[
    "connection closed before message completed",
    "connection reset",
    "broken pipe",
];

/// Classifies a transport failure into exactly one [`ErrorKind`].
///
/// Pure and deterministic: the same error always yields the same kind.
#[must_use]
pub fn classify_transport_error(error: &(dyn StdError + 'static)) -> ErrorKind {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(layer) = current {
        if let Some(kind) = classify_layer(layer) {
            return kind;
        }
        current = layer.source();
    }

    ErrorKind::Unknown(diagnostic_text(error))
}

/// Joins an error and its sources into one diagnostic line.
#[must_use]
pub fn diagnostic_text(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        let message = source.to_string();
        if !text.contains(&message) {
            text.push_str(": ");
            text.push_str(&message);
        }
        current = source.source();
    }
    text
}

fn classify_layer(layer: &(dyn StdError + 'static)) -> Option<ErrorKind> {
    if let Some(reqwest_error) = layer.downcast_ref::<reqwest::Error>()
        && reqwest_error.is_timeout()
    {
        return Some(ErrorKind::Timeout);
    }

    if layer.is::<tokio::time::error::Elapsed>() {
        return Some(ErrorKind::Timeout);
    }

    if let Some(io_error) = layer.downcast_ref::<io::Error>()
        && let Some(kind) = classify_io_kind(io_error.kind())
    {
        return Some(kind);
    }

    let message = layer.to_string().to_ascii_lowercase();
    if HOST_NOT_FOUND_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        return Some(ErrorKind::ServerDown);
    }
    if CONNECTION_DROPPED_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        return Some(ErrorKind::NoInternet);
    }

    None
}

fn classify_io_kind(kind: io::ErrorKind) -> Option<ErrorKind> {
    match kind {
        io::ErrorKind::TimedOut => Some(ErrorKind::Timeout),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::HostUnreachable => {
            Some(ErrorKind::ServerDown)
        }
        io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::NetworkDown
        | io::ErrorKind::NotConnected
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => Some(ErrorKind::NoInternet),
        _ => None,
    }
}
