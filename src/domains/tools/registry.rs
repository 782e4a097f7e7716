//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Dispatch of tool calls by name (used by the HTTP transport)

use rmcp::model::CallToolResult;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ToolError;
use super::definitions::common::into_call_result;
use super::definitions::{DbPingTool, GetMoonPhaseTool, GetWeatherTool};
use super::services::ToolServices;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    services: ToolServices,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![GetWeatherTool::NAME, GetMoonPhaseTool::NAME, DbPingTool::NAME]
    }

    /// Dispatch a tool call to the matching handler.
    ///
    /// Only an unknown name or malformed arguments produce `Err`; everything
    /// that happens inside a tool comes back as an error payload in the
    /// `CallToolResult`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ct: &CancellationToken,
    ) -> Result<CallToolResult, ToolError> {
        info!("Dispatching tool call: {}", name);

        let outcome = match name {
            GetWeatherTool::NAME => {
                GetWeatherTool::execute(&parse_args(arguments)?, &self.services, ct).await
            }
            GetMoonPhaseTool::NAME => {
                GetMoonPhaseTool::execute(&parse_args(arguments)?, &self.services, ct).await
            }
            DbPingTool::NAME => DbPingTool::execute(&self.services).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };

        Ok(into_call_result(outcome))
    }
}

/// Decode call arguments, treating a missing argument object as empty.
fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secrets::StaticSecrets;
    use crate::domains::tools::services::test_support::services_for;
    use rmcp::model::RawContent;

    fn registry() -> ToolRegistry {
        let secrets = StaticSecrets::new()
            .with(GetWeatherTool::CREDENTIAL, "k")
            .with(GetMoonPhaseTool::CREDENTIAL, "k");
        ToolRegistry::new(services_for("http://127.0.0.1:9", secrets))
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let names = registry().tool_names();
        assert_eq!(names, vec!["get_weather", "get_moon_phase", "db_ping"]);
    }

    #[test]
    fn test_all_tools_have_descriptions() {
        let tools = [
            GetWeatherTool::to_tool(),
            GetMoonPhaseTool::to_tool(),
            DbPingTool::to_tool(),
        ];
        assert!(tools.iter().all(|t| t.description.is_some()));
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let result = registry()
            .call_tool("cache_set", serde_json::json!({}), &CancellationToken::new())
            .await;
        assert_eq!(result.unwrap_err(), ToolError::not_found("cache_set"));
    }

    #[tokio::test]
    async fn test_registry_call_missing_arguments() {
        let result = registry()
            .call_tool("get_weather", serde_json::json!({ "lat": "1" }), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_registry_validation_error_is_payload() {
        let result = registry()
            .call_tool(
                "get_weather",
                serde_json::json!({ "lat": "abc", "lon": "0" }),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            r#"{"error":"Invalid latitude or longitude format"}"#
        );
    }

    #[tokio::test]
    async fn test_registry_db_ping_accepts_null_arguments() {
        let result = registry()
            .call_tool("db_ping", serde_json::Value::Null, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            r#"{"error":"db_ping failed: database is not configured"}"#
        );
    }
}
