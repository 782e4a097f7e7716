//! Secret lookup for upstream credentials.
//!
//! Tools never read `std::env` directly. They receive a [`SecretsProvider`]
//! and ask it for a named credential on every call, so rotating a key in the
//! environment takes effect without a restart and tests can substitute a
//! fixed set of values.

use std::collections::HashMap;

/// A source of named secrets (API keys, auth tokens).
pub trait SecretsProvider: Send + Sync {
    /// Look up a secret by name. Returns `None` when it is not set.
    fn secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment at lookup time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretsProvider for EnvSecrets {
    fn secret(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed, in-memory set of secrets.
#[derive(Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    /// Create an empty secret set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, returning the updated set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl SecretsProvider for StaticSecrets {
    fn secret(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Values are redacted; only the names are shown.
impl std::fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("StaticSecrets").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_secrets_lookup() {
        let secrets = StaticSecrets::new().with("Meteosource_Api_Key", "abc123");
        assert_eq!(
            secrets.secret("Meteosource_Api_Key").as_deref(),
            Some("abc123")
        );
        assert!(secrets.secret("AstronomyAPI_key").is_none());
    }

    #[test]
    fn test_static_secrets_redacted_in_debug() {
        let secrets = StaticSecrets::new().with("AstronomyAPI_key", "super_secret_token");
        let debug_str = format!("{:?}", secrets);
        assert!(debug_str.contains("AstronomyAPI_key"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_env_secrets_missing_variable() {
        assert!(
            EnvSecrets
                .secret("STARGAZER_TEST_SECRET_THAT_IS_NEVER_SET")
                .is_none()
        );
    }
}
