//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, credential lookup, the shared upstream HTTP
//! client, the MCP server handler and the transport layer.

pub mod config;
pub mod error;
pub mod secrets;
pub mod server;
pub mod transport;
pub mod upstream;

pub use config::Config;
pub use error::{Error, Result};
pub use secrets::{EnvSecrets, SecretsProvider, StaticSecrets};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
