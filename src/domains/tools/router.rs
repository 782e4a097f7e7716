//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Used by the STDIO and TCP transports. Each tool knows how to create its
//! own route; the router only lists them.

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{DbPingTool, GetMoonPhaseTool, GetWeatherTool};
use super::services::ToolServices;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(services: ToolServices) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetWeatherTool::create_route(services.clone()))
        .with_route(GetMoonPhaseTool::create_route(services.clone()))
        .with_route(DbPingTool::create_route(services))
}
