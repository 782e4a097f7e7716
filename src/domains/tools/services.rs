//! Capabilities injected into every tool invocation.

use std::sync::Arc;

use crate::core::config::{Config, UpstreamConfig};
use crate::core::secrets::SecretsProvider;
use crate::core::upstream::build_http_client;
use crate::domains::accounts::UserRepository;

/// Everything a tool needs from the outside world.
///
/// Cloning is cheap: the HTTP client shares its connection pool and the
/// providers are reference counted.
#[derive(Clone)]
pub struct ToolServices {
    /// Upstream endpoints.
    pub upstream: UpstreamConfig,

    /// Shared outbound HTTP client.
    pub http: reqwest::Client,

    /// Credential source, consulted on every call.
    pub secrets: Arc<dyn SecretsProvider>,

    /// User store, if one is configured.
    pub users: Option<Arc<dyn UserRepository>>,
}

impl ToolServices {
    /// Build services from configuration, creating the shared HTTP client.
    pub fn from_config(
        config: &Config,
        secrets: Arc<dyn SecretsProvider>,
    ) -> crate::Result<Self> {
        let http = build_http_client(&config.upstream)?;
        Ok(Self {
            upstream: config.upstream.clone(),
            http,
            secrets,
            users: None,
        })
    }

    /// Attach a user store.
    pub fn with_users(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = Some(users);
        self
    }
}

impl std::fmt::Debug for ToolServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolServices")
            .field("upstream", &self.upstream)
            .field("users", &self.users.is_some())
            .finish_non_exhaustive()
    }
}
