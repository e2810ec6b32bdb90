//! Core data types for ragdex.
//!
//! Chunks, file-level metadata, indexing results and the shapes
//! returned by search and stats queries.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Flat metadata mapping as persisted alongside each record
pub type Metadata = serde_json::Map<String, Value>;

/// File-level metadata, created once per file and shared by all of its chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_path: String,
    pub file_name: String,
    /// Extension with its leading dot, empty when the file has none
    pub file_ext: String,
    pub file_size: u64,
    /// Seconds since the unix epoch
    pub modified_time: f64,
    pub language: String,
    /// Hex SHA-256 of the raw bytes
    pub file_hash: String,
    /// Path relative to the nearest ancestor holding a `.git` entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl FileMetadata {
    /// Copy with a different language, used when chunking resolves one
    pub fn with_language(&self, language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..self.clone()
        }
    }

    /// Write every field into a flat record mapping
    pub fn write_into(&self, record: &mut Metadata) {
        record.insert("file_path".into(), json!(self.file_path));
        record.insert("file_name".into(), json!(self.file_name));
        record.insert("file_ext".into(), json!(self.file_ext));
        record.insert("file_size".into(), json!(self.file_size));
        record.insert("modified_time".into(), json!(self.modified_time));
        record.insert("language".into(), json!(self.language));
        record.insert("file_hash".into(), json!(self.file_hash));
        if let Some(git) = &self.git_repo_path {
            record.insert("git_repo_path".into(), json!(git));
        }
        if let Some(encoding) = &self.encoding {
            record.insert("encoding".into(), json!(encoding));
        }
    }
}

/// Position and classification of one chunk within its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Zero-based, contiguous within one document
    pub chunk_index: usize,
    pub total_chunks: usize,
    /// Character offsets into the source text
    pub char_start: usize,
    pub char_end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub chunk_type: String,
}

/// A chunk of text plus its metadata
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub source: Option<Arc<FileMetadata>>,
}

impl DocumentChunk {
    /// Flatten source and chunk metadata into one store record
    pub fn flatten(&self) -> Metadata {
        let mut record = Metadata::new();

        if let Some(source) = &self.source {
            source.write_into(&mut record);
        }

        let meta = &self.metadata;
        record.insert("chunk_index".into(), json!(meta.chunk_index));
        record.insert("total_chunks".into(), json!(meta.total_chunks));
        record.insert("char_start".into(), json!(meta.char_start));
        record.insert("char_end".into(), json!(meta.char_end));
        record.insert("chunk_type".into(), json!(meta.chunk_type));
        if let Some(tokens) = meta.token_count {
            record.insert("token_count".into(), json!(tokens));
        }
        if let Some(language) = &meta.language {
            record
                .entry("language")
                .or_insert_with(|| json!(language));
        }

        record
    }
}

/// Outcome of one `index_directory` run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexingResult {
    pub total_files: usize,
    pub total_chunks: usize,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub errors: Vec<String>,
    pub collection_name: String,
}

/// Collection overview for stats output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub name: String,
    pub total_chunks: usize,
    /// Counted over a sample of stored records
    pub languages: BTreeMap<String, usize>,
    pub file_types: BTreeMap<String, usize>,
    pub sample_size: usize,
    pub metadata: Metadata,
}

/// Collection listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub name: String,
    pub count: usize,
    pub metadata: Metadata,
}

/// Ranked search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based rank
    pub rank: usize,
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
    /// Cosine distance, lower is closer
    pub distance: f32,
    /// `max(0, 1 - distance) * 100`
    pub relevance: f32,
}
