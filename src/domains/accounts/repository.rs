//! User repository and its SQLite implementation.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use super::error::PersistenceError;
use super::model::{User, UserRow};
use crate::core::config::DatabaseConfig;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL
    )
"#;

const CREATE_USERNAME_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_username ON users (username)";

/// Storage for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the users table and its unique username index if missing.
    async fn ensure_schema(&self) -> Result<(), PersistenceError>;

    /// Insert a new user. Fails with [`PersistenceError::DuplicateUsername`]
    /// when the username is taken.
    async fn insert_user(&self, username: &str) -> Result<User, PersistenceError>;

    /// Look up a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PersistenceError>;

    /// Round-trip a trivial query to check the store is reachable.
    async fn ping(&self) -> Result<(), PersistenceError>;
}

/// [`UserRepository`] backed by an SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the configured URL, creating the database file if needed.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A private in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        info!("Ensuring user schema exists");

        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_USERNAME_INDEX).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn insert_user(&self, username: &str) -> Result<User, PersistenceError> {
        let user = User::new(username);

        let inserted = sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(user.id.to_string())
            .bind(&user.username)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                match self.find_by_username(username).await {
                    Ok(Some(holder)) => warn!(
                        "Rejected duplicate username {:?}, already held by {}",
                        username, holder.id
                    ),
                    _ => warn!("Rejected duplicate username {:?}", username),
                }
                return Err(PersistenceError::DuplicateUsername(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        debug!("Inserted user {} ({})", user.username, user.id);
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PersistenceError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        if one == 1 {
            Ok(())
        } else {
            Err(PersistenceError::invalid_data(format!(
                "SELECT 1 returned {}",
                one
            )))
        }
    }
}

/// Open the configured user store, seeding the schema when asked.
///
/// Returns `Ok(None)` when no database URL is configured.
pub async fn open_user_store(
    config: &DatabaseConfig,
) -> Result<Option<Arc<dyn UserRepository>>, PersistenceError> {
    let Some(url) = config.url.as_deref() else {
        warn!("MCP_DATABASE_URL not set, user store disabled; db_ping will report an error");
        return Ok(None);
    };

    let repository: Arc<dyn UserRepository> =
        Arc::new(SqliteUserRepository::connect(url, config.max_connections).await?);
    info!("User store connected");

    if config.seed {
        repository.ensure_schema().await?;
    }

    Ok(Some(repository))
}
