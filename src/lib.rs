//! ASimpleStarGazer MCP server library.
//!
//! An MCP tool gateway for planning a night of stargazing: the weather
//! forecast for a coordinate pair and the moon phase for a date, each fetched
//! from a third-party API and returned as a JSON string.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, credentials, the shared HTTP client,
//!   the server handler and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: `get_weather`, `get_moon_phase` and `db_ping`
//!   - **accounts**: the user store (unique usernames)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stargazer_mcp_server::core::{Config, EnvSecrets, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (config, _warnings) = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::build(config, Arc::new(EnvSecrets)).await?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
