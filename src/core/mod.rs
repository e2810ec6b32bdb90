//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the adapters (CLI, MCP).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Chunk, file and result data structures
//! - **xdg**: XDG directory handling
//! - **logging**: Tracing subscriber setup
//! - **language**: Extension table and language families
//! - **chunking**: Fixed, paragraph and code-aware chunkers
//! - **indexer**: Path filtering, file reading and the indexing pipeline
//! - **store**: Document store traits, Tantivy store, embeddings
//! - **search**: Query and document service
//! - **services**: Unified service container

pub mod chunking;
pub mod config;
pub mod error;
pub mod indexer;
pub mod language;
pub mod logging;
pub mod search;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RagError, Result};
pub use services::Services;
