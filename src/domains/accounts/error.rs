//! User store error types.

use thiserror::Error;

/// Errors raised by a [`UserRepository`](super::UserRepository).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Another user already holds this username.
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// A stored row could not be mapped back to a [`User`](super::User).
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PersistenceError {
    /// Create a new "invalid data" error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Whether this error is a uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateUsername(_))
    }
}
