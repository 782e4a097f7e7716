//! ASimpleStarGazer MCP server entry point.
//!
//! Loads configuration, initializes logging on stderr (stdout belongs to the
//! STDIO transport), wires the server and serves the tools.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use stargazer_mcp_server::core::config::LoggingConfig;
use stargazer_mcp_server::core::{Config, EnvSecrets, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, warnings) = Config::from_env();
    init_logging(&config.logging);
    for warning in &warnings {
        warn!("{}", warning);
    }

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::build(config, Arc::new(EnvSecrets))
        .await
        .context("failed to start the server")?;

    transport.run(server).await?;

    info!("Server shutting down");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
