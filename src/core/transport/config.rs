//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Which transport the server listens on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport with line-delimited JSON-RPC.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port number to listen on.
    pub port: u16,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port number to listen on.
    pub port: u16,

    /// Path of the JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Allow any origin (for browser clients).
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 8080,
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            Self::Tcp(TcpConfig::default())
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            Self::Http(HttpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

impl TransportConfig {
    /// Select a transport from `MCP_TRANSPORT` (`stdio`, `tcp` or `http`).
    ///
    /// Unknown values, and transports not compiled in, fall back to the
    /// default transport with a message pushed onto `warnings`.
    pub fn from_env(warnings: &mut Vec<String>) -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "tcp")]
            "tcp" => Self::Tcp(TcpConfig {
                host: std::env::var("MCP_TCP_HOST").unwrap_or_else(|_| default_host()),
                port: port_from_env("MCP_TCP_PORT", 3000, warnings),
            }),
            #[cfg(feature = "http")]
            "http" => Self::Http(HttpConfig {
                host: std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host()),
                port: port_from_env("MCP_HTTP_PORT", 8080, warnings),
                rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path()),
                enable_cors: std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true),
            }),
            "" | "stdio" => Self::default(),
            other => {
                warnings.push(format!(
                    "MCP_TRANSPORT={:?} is not available in this build, using default",
                    other
                ));
                Self::default()
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn port_from_env(name: &str, default: u16, warnings: &mut Vec<String>) -> u16 {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warnings.push(format!("Ignoring {}={:?}: not a port number", name, raw));
            default
        }),
        Err(_) => default,
    }
}
