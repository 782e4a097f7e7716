//! TCP transport: line-delimited JSON-RPC, one MCP session per connection.

use std::net::SocketAddr;
use std::time::Duration;

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Accept connections forever; each one gets its own server clone.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
                    }
                    tokio::spawn(serve_connection(server.clone(), stream, peer));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

async fn serve_connection(server: McpServer, stream: TcpStream, peer: SocketAddr) {
    let running = match server.serve(stream).await {
        Ok(running) => running,
        Err(e) => {
            warn!("MCP handshake with {} failed: {}", peer, e);
            return;
        }
    };
    info!("Client {} connected", peer);

    match running.waiting().await {
        Ok(reason) => debug!("Client {} disconnected: {:?}", peer, reason),
        Err(e) => warn!("Error while serving client {}: {}", peer, e),
    }
}
