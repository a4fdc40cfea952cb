//! Error types for the exporter.
//!
//! Upstream failures never leave the collection pass: [`FetchError`] is only
//! classified and logged by the fetcher before it reports "no data".
//! [`ExporterError`] covers the process-level failures around it (client
//! construction, binding the scrape listener, encoding a response).

use std::net::SocketAddr;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single call to the node operator API produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, reset, timed out, etc.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The node answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// The body could not be parsed as JSON.
    #[error("invalid JSON body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    /// Short, stable name used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

/// Process-level errors raised while starting or running the exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// The HTTP client for the node API could not be built.
    #[error("failed to build node API client: {0}")]
    Client(#[from] reqwest::Error),

    /// The scrape listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The scrape server stopped with an I/O error.
    #[error("metrics server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Records could not be rendered in the text exposition format.
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
}

/// Result alias for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind() {
        let err = FetchError::Status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "status");
        assert_eq!(err.to_string(), "unexpected status 503 Service Unavailable");
    }

    #[test]
    fn test_bind_error_display() {
        let addr: SocketAddr = "127.0.0.1:9651".parse().unwrap();
        let err = ExporterError::Bind {
            addr,
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:9651: address in use");
    }
}
