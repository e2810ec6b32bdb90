//! Stdio MCP adapter
//!
//! JSON-RPC 2.0 framing, the protocol handshake and the six ragdex tools
//! (index, search, add, list, delete, stats) over a shared [`Services`].
//!
//! [`Services`]: crate::core::services::Services

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use error::McpError;
pub use server::McpServer;
pub use tools::{McpToolHandler, ToolRegistry};
