//! Tools domain module.
//!
//! Tools are the functions MCP clients call. Every tool here answers with a
//! single JSON string: a success payload, or `{"error": "<message>"}`. No
//! failure inside a tool reaches the transport as a protocol error.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `services.rs` - HTTP client, secrets and user store handed to each tool
//! - `router.rs` - rmcp ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Tool metadata and dispatch by name
//! - `error.rs` - The error taxonomy and its wire message
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/`
//! 2. Define params, `execute()`, `to_tool()` and `create_route()`
//! 3. Export in `definitions/mod.rs`
//! 4. Add the route in `router.rs` and the dispatch arm in `registry.rs`

pub mod definitions;
mod error;
mod registry;
pub mod router;
pub mod services;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
pub use services::ToolServices;
