//! STDIO transport: the default MCP mode, one client per process.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    /// Serve over stdin/stdout until the client closes the stream.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let running = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = running
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO session ended: {:?}", reason);
        Ok(())
    }
}
