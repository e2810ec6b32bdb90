//! Configuration management for ragdex.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::chunking::{ChunkingStrategy, TokenizerKind};
use crate::core::error::{RagError, Result};
use crate::core::indexer::TextEncoding;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Target chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters carried over between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Fixed-size chunks shorter than this are dropped
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    #[serde(default)]
    pub strategy: ChunkingStrategy,

    /// Chunks buffered before each store flush
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u64,

    /// Decoding attempts, in order
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    #[serde(default)]
    pub tokenizer: TokenizerKind,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per collection
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

/// Embedding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// MCP server identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_name")]
    pub name: String,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_min_chunk_size() -> usize {
    100
}

fn default_batch_size() -> usize {
    100
}

fn default_max_file_size() -> u64 {
    10
}

fn default_encodings() -> Vec<String> {
    TextEncoding::DEFAULT_ORDER
        .iter()
        .map(|e| e.name().to_string())
        .collect()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ragdex_db")
}

fn default_model_name() -> String {
    crate::core::store::DEFAULT_MODEL.to_string()
}

fn default_k() -> usize {
    5
}

fn default_max_k() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

fn default_server_name() -> String {
    "personal-rag-server".to_string()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chunk_size: default_min_chunk_size(),
            strategy: ChunkingStrategy::default(),
            batch_size: default_batch_size(),
            max_file_size_mb: default_max_file_size(),
            encodings: default_encodings(),
            tokenizer: TokenizerKind::default(),
        }
    }
}

impl IndexingConfig {
    /// Parsed decoding order
    pub fn text_encodings(&self) -> Result<Vec<TextEncoding>> {
        self.encodings
            .iter()
            .map(|name| TextEncoding::from_str(name))
            .collect()
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RagError::config_at(format!("Failed to read config file: {e}"), path)
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// The TOML file is read from `xdg.config_file()` when it exists.
    /// An unset `db_path` is placed under the XDG data directory.
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config_file = xdg.config_file();
        let mut config = if config_file.exists() {
            Self::from_file(&config_file)?
        } else {
            Self::default()
        };

        if config.storage.db_path == default_db_path() {
            config.storage.db_path = xdg.collections_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Indexing configuration
        if let Some(size) = env_parse("RAGDEX_CHUNK_SIZE") {
            self.indexing.chunk_size = size;
        }
        if let Some(overlap) = env_parse("RAGDEX_CHUNK_OVERLAP") {
            self.indexing.chunk_overlap = overlap;
        }
        if let Some(min) = env_parse("RAGDEX_MIN_CHUNK_SIZE") {
            self.indexing.min_chunk_size = min;
        }
        if let Some(strategy) = env_parse("RAGDEX_STRATEGY") {
            self.indexing.strategy = strategy;
        }
        if let Some(batch) = env_parse("RAGDEX_BATCH_SIZE") {
            self.indexing.batch_size = batch;
        }
        if let Some(max_size) = env_parse("RAGDEX_MAX_FILE_SIZE_MB") {
            self.indexing.max_file_size_mb = max_size;
        }
        if let Some(tokenizer) = env_parse("RAGDEX_TOKENIZER") {
            self.indexing.tokenizer = tokenizer;
        }

        // Storage configuration
        if let Ok(db_path) = env::var("RAGDEX_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }

        // Embedding configuration
        if let Ok(model) = env::var("RAGDEX_EMBEDDING_MODEL") {
            self.embedding.model_name = model;
        }

        // Search configuration
        if let Some(k) = env_parse("RAGDEX_DEFAULT_K") {
            self.search.default_k = k;
        }
        if let Some(k) = env_parse("RAGDEX_MAX_K") {
            self.search.max_k = k;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let indexing = &self.indexing;

        if indexing.chunk_size == 0 {
            return Err(RagError::config("Chunk size must be non-zero"));
        }

        if indexing.chunk_overlap >= indexing.chunk_size {
            return Err(RagError::config(
                "Chunk overlap must be less than chunk size",
            ));
        }

        if indexing.min_chunk_size > indexing.chunk_size {
            return Err(RagError::config(
                "Minimum chunk size cannot exceed chunk size",
            ));
        }

        if indexing.batch_size == 0 {
            return Err(RagError::config("Batch size must be non-zero"));
        }

        if indexing.encodings.is_empty() {
            return Err(RagError::config("At least one encoding is required"));
        }
        indexing
            .text_encodings()
            .map_err(|e| RagError::config(e.to_string()))?;

        if self.embedding.model_name.trim().is_empty() {
            return Err(RagError::config("Embedding model name must be set"));
        }

        if self.search.default_k == 0 {
            return Err(RagError::config("Default k must be non-zero"));
        }

        if self.search.default_k > self.search.max_k {
            return Err(RagError::config("Default k cannot exceed max k"));
        }

        if self.search.max_query_length == 0 {
            return Err(RagError::config("Max query length must be non-zero"));
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Chunk overlap: {} chars", self.indexing.chunk_overlap);
        tracing::info!("  Min chunk size: {} chars", self.indexing.min_chunk_size);
        tracing::info!("  Strategy: {}", self.indexing.strategy);
        tracing::info!("  Batch size: {}", self.indexing.batch_size);
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!("  Encodings: {}", self.indexing.encodings.join(", "));
        tracing::info!("  Tokenizer: {}", self.indexing.tokenizer);
        tracing::info!("  DB path: {:?}", self.storage.db_path);
        tracing::info!("  Embedding model: {}", self.embedding.model_name);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Max k: {}", self.search.max_k);
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
