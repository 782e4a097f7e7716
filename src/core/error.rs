//! Error types and handling for the MCP server.
//!
//! Tool invocations never surface these: every tool folds its failures into
//! an `{"error": ...}` payload. This type covers startup, where a failure
//! should stop the process.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured user store could not be opened or seeded.
    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::domains::accounts::PersistenceError),

    /// The upstream HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::accounts::PersistenceError;

    #[test]
    fn test_persistence_error_converts() {
        let err: Error = PersistenceError::DuplicateUsername("vega".to_string()).into();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(err.to_string().starts_with("Persistence error: "));
    }
}
