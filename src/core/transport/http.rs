//! HTTP transport: JSON-RPC over POST, for curl and browser clients.
//!
//! Stateless: every POST carries one request. Only the tool methods are
//! routed; resources and prompts are not served.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::INSTRUCTIONS;
use crate::domains::tools::ToolError;

const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct HttpTransport {
    config: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    pub fn method_not_found(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32601, msg)
    }

    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

#[derive(Clone)]
struct AppState {
    server: McpServer,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    fn router(&self, server: McpServer) -> Router {
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(AppState { server })
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            app = app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        app
    }

    /// Serve until the listener fails.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (JSON-RPC at POST {}, CORS {})",
            addr,
            self.config.rpc_path,
            if self.config.enable_cors { "enabled" } else { "disabled" }
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))
    }
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "tools": state.server.registry().tool_names(),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[instrument(skip_all, fields(method = %request.method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    Json(process_request(&state.server, request).await)
}

async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": server.name(),
                    "version": server.version()
                },
                "instructions": INSTRUCTIONS
            }),
        ),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => {
            JsonRpcResponse::success(request.id, json!({ "tools": server.list_tools() }))
        }
        "tools/call" => handle_tools_call(server, request).await,
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }
        other => {
            warn!("Unknown method: {}", other);
            JsonRpcResponse::method_not_found(request.id, "Method not found")
        }
    }
}

async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    // An HTTP request has no cancellation channel; the upstream timeout bounds it.
    let ct = CancellationToken::new();
    match server.registry().call_tool(name, arguments, &ct).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e @ ToolError::NotFound(_)) => {
            JsonRpcResponse::method_not_found(request.id, e.to_string())
        }
        Err(e) => JsonRpcResponse::invalid_params(request.id, e.to_string()),
    }
}
