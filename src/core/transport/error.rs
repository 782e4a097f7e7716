//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised while starting or serving a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind the listening socket.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake could not be completed.
    #[error("Server initialization error: {0}")]
    Init(String),

    /// The rmcp service stopped with an error.
    #[error("Service error: {0}")]
    Service(String),

    /// The HTTP server failed while running.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
