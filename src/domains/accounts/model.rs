//! User account model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::error::PersistenceError;

/// A registered user. `id` is assigned at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl User {
    /// A new user with a freshly generated id.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
        }
    }
}

/// Row shape in the `users` table; ids are stored as hyphenated text.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub username: String,
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id).map_err(|e| {
            PersistenceError::invalid_data(format!("user id {:?}: {}", row.id, e))
        })?;
        Ok(Self {
            id,
            username: row.username,
        })
    }
}
