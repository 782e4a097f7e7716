//! Accounts domain module.
//!
//! Durable storage of user accounts. Usernames are unique; ids are UUIDs
//! generated on insert. The rest of the server only sees the
//! [`UserRepository`] trait.

mod error;
mod model;
mod repository;

pub use error::PersistenceError;
pub use model::User;
pub use repository::{SqliteUserRepository, UserRepository, open_user_store};
