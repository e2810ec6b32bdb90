//! ragdex - Local codebase indexing for retrieval-augmented search
//!
//! Walks a directory, filters it with gitignore-style rules, splits
//! each file into position-tracked chunks and stores them in a local
//! Tantivy-backed collection for nearest-neighbor search.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg, logging
//!   - chunking (fixed, paragraph, code-aware)
//!   - indexer (path filter, file reader, pipeline)
//!   - store (collections, embeddings)
//!   - search, services
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! - **mcp**: MCP adapter (depends on core)
//!   - server, tools, protocol
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Exact chunk positions, contiguous chunk indices
//! - Stable `path#hash8#chunk_N` chunk identifiers
//! - Batched, fail-fast store writes with per-file error records

// Core domain logic (protocol-agnostic)
pub mod core;

// Command-line adapter
pub mod cli;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{RagError, Result};
pub use core::services::Services;
pub use core::types::*;
