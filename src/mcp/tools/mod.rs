//! MCP tool implementations
//!
//! This module contains all MCP tool handlers that expose ragdex's
//! indexing and search to MCP clients.

pub mod add_documents;
pub mod collection_stats;
pub mod delete_collection;
pub mod handler;
pub mod helpers;
pub mod index_directory;
pub mod list_collections;
pub mod registry;
pub mod search_documents;

pub use add_documents::AddDocumentsHandler;
pub use collection_stats::CollectionStatsHandler;
pub use delete_collection::DeleteCollectionHandler;
pub use handler::{text_content, McpToolHandler};
pub use index_directory::IndexDirectoryHandler;
pub use list_collections::ListCollectionsHandler;
pub use registry::ToolRegistry;
pub use search_documents::SearchDocumentsHandler;
