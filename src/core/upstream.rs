//! Shared outbound HTTP client.
//!
//! One `reqwest::Client` is built at startup and cloned into every tool
//! invocation. Clones share the same connection pool.

use std::time::Duration;

use tracing::debug;

use super::config::UpstreamConfig;

/// Build the HTTP client used for all upstream API calls.
pub fn build_http_client(config: &UpstreamConfig) -> reqwest::Result<reqwest::Client> {
    debug!(
        "Building upstream HTTP client (timeout={}s, user_agent={})",
        config.timeout_secs, config.user_agent
    );

    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}
