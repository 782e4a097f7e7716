//! MCP Server implementation and lifecycle management.
//!
//! The server only advertises tools. Tool routes are built in
//! `domains/tools/router.rs`, so adding a tool does not touch this file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use super::secrets::SecretsProvider;
use crate::domains::accounts::open_user_store;
use crate::domains::tools::{ToolRegistry, ToolServices, build_tool_router};

/// Instructions sent to clients on initialization.
pub const INSTRUCTIONS: &str = "ASimpleStarGazer: look up the weather (get_weather) and the \
     moon phase (get_moon_phase) for a location before a night of stargazing. Every tool returns \
     a JSON string; failures come back as {\"error\": \"...\"}.";

/// The main MCP server handler.
///
/// Implements the rmcp `ServerHandler` trait. Cloned once per connection on
/// the TCP transport; clones share the configuration and tool services.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Name-based dispatch, used by the HTTP transport.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and services.
    pub fn new(config: Config, services: ToolServices) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(services.clone()),
            registry: Arc::new(ToolRegistry::new(services)),
            config: Arc::new(config),
        }
    }

    /// Wire a server from configuration: the shared HTTP client, the
    /// credential source and, when `MCP_DATABASE_URL` is set, the user store.
    pub async fn build(config: Config, secrets: Arc<dyn SecretsProvider>) -> super::Result<Self> {
        let mut services = ToolServices::from_config(&config, secrets)?;
        if let Some(users) = open_user_store(&config.database).await? {
            services = services.with_users(users);
        }
        Ok(Self::new(config, services))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// List all available tools as JSON (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
