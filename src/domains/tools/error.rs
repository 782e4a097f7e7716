//! Tool-specific error types.
//!
//! The `Display` text of each variant is exactly the message placed in the
//! `{"error": ...}` payload returned to the caller.

use thiserror::Error;

/// Errors that can occur during a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A required credential is missing or blank.
    #[error("{0} not found in environment variables")]
    MissingCredential(String),

    /// Invalid arguments were provided to the tool.
    #[error("{0}")]
    InvalidArguments(String),

    /// The upstream answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The call was cancelled or the upstream did not answer in time.
    #[error("Request timeout")]
    Timeout,

    /// The upstream body could not be decoded.
    #[error("Error decoding JSON response from {upstream}: {message}")]
    Decode { upstream: String, message: String },

    /// A non-upstream operation failed (e.g. the user store).
    #[error("{operation} failed: {message}")]
    Failed { operation: String, message: String },

    /// Any other runtime fault inside a tool.
    #[error("Unexpected error in {tool}: {message}")]
    Unexpected { tool: String, message: String },
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "missing credential" error.
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create an upstream status error, truncating long bodies.
    pub fn upstream_status(status: u16, body: &str) -> Self {
        Self::UpstreamStatus {
            status,
            body: super::definitions::common::truncate(
                body,
                super::definitions::common::ERROR_BODY_LIMIT,
            ),
        }
    }

    /// Create a new decoding error.
    pub fn decode(upstream: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            upstream: upstream.into(),
            message: msg.into(),
        }
    }

    /// Create a new "operation failed" error.
    pub fn failed(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Failed {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a new "unexpected" error.
    pub fn unexpected(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Unexpected {
            tool: tool.into(),
            message: msg.into(),
        }
    }

    /// Render this error as the wire payload `{"error": "<message>"}`.
    pub fn to_payload(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}
