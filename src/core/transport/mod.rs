//! Transport layer for the MCP server.
//!
//! - **STDIO**: standard input/output (default) - feature: `stdio`
//! - **TCP**: line-delimited JSON-RPC over a socket - feature: `tcp`
//! - **HTTP**: JSON-RPC over POST with axum - feature: `http`
//!
//! Every transport hands requests to the same `McpServer`, so tool behavior
//! does not depend on how the client connects.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
