//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.
//! Command names mirror the MCP tool names where both surfaces offer the operation.

pub mod collections;
pub mod completions;
pub mod config;
pub mod ignore;
pub mod index;
pub mod search;

// Re-export argument types for use in mod.rs
pub use collections::{DeleteArgs, StatsArgs};
pub use completions::CompletionsArgs;
pub use ignore::CreateIgnoreArgs;
pub use index::IndexArgs;
pub use search::SearchArgs;
