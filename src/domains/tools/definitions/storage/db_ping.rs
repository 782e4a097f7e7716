//! User store health check tool.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{ToolOutcome, into_call_result};
use crate::domains::tools::services::ToolServices;

/// The tool takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DbPingParams {}

/// Checks that the user store answers a trivial query.
#[derive(Debug, Clone)]
pub struct DbPingTool;

impl DbPingTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "db_ping";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Ping the user database by running SELECT 1. Returns {\"result\": true} when reachable.";

    /// Execute the tool logic.
    pub async fn execute(services: &ToolServices) -> ToolOutcome {
        let Some(users) = services.users.as_ref() else {
            return Err(ToolError::failed(Self::NAME, "database is not configured"));
        };

        match users.ping().await {
            Ok(()) => {
                info!("Database ping succeeded");
                Ok(serde_json::json!({ "result": true }).to_string())
            }
            Err(e) => {
                error!("Database ping failed: {}", e);
                Err(ToolError::failed(Self::NAME, e.to_string()))
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DbPingParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(services: ToolServices) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let services = services.clone();
            async move {
                let _params: DbPingParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(into_call_result(Self::execute(&services).await))
            }
            .boxed()
        })
    }
}
