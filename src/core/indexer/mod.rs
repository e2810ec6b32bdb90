//! Document indexing module.
//!
//! Turns a directory tree into stored chunk records. Key pieces:
//!
//! - Ignore-rule filtering with subtree pruning (`.mcpignore`, `.gitignore`)
//! - Single-pass file reading with hashing and ordered encoding attempts
//! - Stable `path#hash8#chunk_N` chunk identifiers
//! - Batched, fail-fast writes to the document store
//!
//! Per-file problems never abort a run; they surface as [`SkipReason`]s
//! and formatted entries in the run's error list.

pub mod filter;
pub mod identity;
pub mod metadata;
pub mod pipeline;
pub mod reader;

pub use filter::{FilterOptions, FilterStats, PathFilter, DEFAULT_IGNORE_PATTERNS};
pub use identity::{chunk_id, ChunkId};
pub use metadata::file_metadata;
pub use pipeline::{collection_stats, ChunkRecord, FileOutcome, IndexingOptions, IndexingPipeline};
pub use reader::{FileReader, ReadOutcome, SkipReason, TextEncoding};
