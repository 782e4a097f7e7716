//! Tools that touch the user store.

pub mod db_ping;

pub use db_ping::{DbPingParams, DbPingTool};
