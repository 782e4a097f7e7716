//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the weather, moon-phase and database tools exposed over MCP
//! - **accounts**: user account storage

pub mod accounts;
pub mod tools;
