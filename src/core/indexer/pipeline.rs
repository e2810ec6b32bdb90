//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow:
//! 1. Filter the directory tree
//! 2. Read and hash each file once
//! 3. Chunk the decoded text
//! 4. Buffer chunk records and flush them to the store in batches
//!
//! Files are processed one at a time in walk order. A file that cannot
//! be read, decoded or described is recorded and skipped; a batch the
//! store rejects aborts the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::core::chunking::{
    get_chunker, ChunkParams, Chunker, ChunkingStrategy, TokenCounter, TokenizerKind,
};
use crate::core::config::Config;
use crate::core::error::{RagError, Result};
use crate::core::store::{Collection, DocumentStore, ModelRegistry};
use crate::core::types::{CollectionStats, IndexingResult, Metadata};

use super::filter::{FilterOptions, PathFilter};
use super::identity::chunk_id;
use super::metadata::file_metadata;
use super::reader::{FileReader, ReadOutcome, SkipReason, TextEncoding};

/// Records sampled when computing collection stats
const STATS_SAMPLE_SIZE: usize = 100;

/// Files between progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// Everything a pipeline run needs besides the store
#[derive(Debug, Clone)]
pub struct IndexingOptions {
    pub strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
    pub batch_size: usize,
    /// Files larger than this many bytes are skipped unread
    pub max_file_size: u64,
    pub encodings: Vec<TextEncoding>,
    pub tokenizer: TokenizerKind,
    pub embedding_model: String,
}

impl Default for IndexingOptions {
    /// Options of the default configuration, whose encoding names are
    /// exactly [`TextEncoding::DEFAULT_ORDER`]
    fn default() -> Self {
        Self::with_encodings(&Config::default(), TextEncoding::DEFAULT_ORDER.to_vec())
    }
}

impl IndexingOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        let encodings = config.indexing.text_encodings()?;
        Ok(Self::with_encodings(config, encodings))
    }

    fn with_encodings(config: &Config, encodings: Vec<TextEncoding>) -> Self {
        let indexing = &config.indexing;
        Self {
            strategy: indexing.strategy,
            chunk_size: indexing.chunk_size,
            chunk_overlap: indexing.chunk_overlap,
            min_chunk_size: indexing.min_chunk_size,
            batch_size: indexing.batch_size,
            max_file_size: indexing.max_file_size_bytes(),
            encodings,
            tokenizer: indexing.tokenizer,
            embedding_model: config.embedding.model_name.clone(),
        }
    }

    fn chunk_params(&self) -> ChunkParams {
        ChunkParams::new(self.chunk_size, self.chunk_overlap, self.min_chunk_size)
            .with_tokens(TokenCounter::for_kind(self.tokenizer))
    }
}

/// One chunk flattened into store-native form
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

/// Result of processing a single file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Indexed(Vec<ChunkRecord>),
    Skipped(SkipReason),
    Failed(String),
}

/// Pending records awaiting a flush
#[derive(Default)]
struct Batch {
    ids: Vec<String>,
    texts: Vec<String>,
    metadatas: Vec<Metadata>,
}

impl Batch {
    fn push(&mut self, record: ChunkRecord) {
        self.ids.push(record.id);
        self.texts.push(record.text);
        self.metadatas.push(record.metadata);
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn flush(&mut self, collection: &dyn Collection) -> Result<()> {
        if self.ids.is_empty() {
            return Ok(());
        }

        tracing::debug!("Adding batch of {} chunks to collection", self.len());
        collection
            .add(&self.ids, &self.texts, &self.metadatas)
            .map_err(|e| {
                tracing::error!("Failed to add batch to collection: {}", e);
                if e.is_store() {
                    e
                } else {
                    RagError::store(format!("Failed to add batch: {e}"), collection.name(), "add")
                }
            })?;

        self.ids.clear();
        self.texts.clear();
        self.metadatas.clear();
        Ok(())
    }
}

/// Orchestrates filtering, reading, chunking and batched storage
pub struct IndexingPipeline {
    store: Arc<dyn DocumentStore>,
    registry: Arc<ModelRegistry>,
    options: IndexingOptions,
    chunker: Chunker,
    reader: FileReader,
}

impl IndexingPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: Arc<ModelRegistry>,
        options: IndexingOptions,
    ) -> Self {
        let chunker = get_chunker(options.strategy, options.chunk_params());
        let reader = FileReader::new(options.max_file_size, options.encodings.clone());
        Self {
            store,
            registry,
            options,
            chunker,
            reader,
        }
    }

    pub fn options(&self) -> &IndexingOptions {
        &self.options
    }

    /// Index every filtered file under `directory` into `collection_name`
    pub fn index_directory(
        &self,
        directory: &Path,
        collection_name: &str,
        extensions: Option<&[String]>,
        use_ignore_rules: bool,
        force_reindex: bool,
    ) -> Result<IndexingResult> {
        let start = Instant::now();

        let root = directory
            .canonicalize()
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| {
                RagError::store(
                    format!("Directory does not exist: {}", directory.display()),
                    collection_name,
                    "index",
                )
            })?;

        let filter = PathFilter::with_options(
            &root,
            FilterOptions {
                use_defaults: use_ignore_rules,
                custom_patterns: self.store_exclusion(&root).into_iter().collect(),
                ..FilterOptions::default()
            },
        )?;
        let files = filter.get_filtered_files(extensions, true);
        tracing::info!("Found {} files to index in {}", files.len(), root.display());

        if force_reindex {
            match self.store.delete_collection(collection_name) {
                Ok(()) => tracing::info!("Deleted existing collection: {}", collection_name),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let embedder = self.registry.acquire(&self.options.embedding_model)?;
        let mut collection_metadata = Metadata::new();
        collection_metadata.insert(
            "indexed_directory".into(),
            json!(root.display().to_string()),
        );
        let collection = self
            .store
            .get_or_create_collection(collection_name, embedder, collection_metadata)
            .map_err(|e| {
                if e.is_store() || e.is_validation() {
                    e
                } else {
                    RagError::store(
                        format!("Failed to create collection: {e}"),
                        collection_name,
                        "create",
                    )
                }
            })?;

        let result = self.index_files(&files, &root, collection.as_ref())?;

        tracing::info!(
            "Indexing complete: {} files, {} chunks, {} skipped in {}ms",
            result.files_indexed,
            result.total_chunks,
            result.files_skipped,
            start.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Anchored pattern covering the store directory when it lies under `root`
    fn store_exclusion(&self, root: &Path) -> Option<String> {
        let location = self.store.location()?.canonicalize().ok()?;
        let rel = location.strip_prefix(root).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        tracing::debug!("Excluding store directory from walk: {}", rel);
        Some(format!("/{rel}/"))
    }

    fn index_files(
        &self,
        files: &[PathBuf],
        root: &Path,
        collection: &dyn Collection,
    ) -> Result<IndexingResult> {
        let mut result = IndexingResult {
            total_files: files.len(),
            collection_name: collection.name().to_string(),
            ..IndexingResult::default()
        };
        let mut batch = Batch::default();
        let batch_size = self.options.batch_size.max(1);

        for (idx, path) in files.iter().enumerate() {
            if idx % PROGRESS_INTERVAL == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files processed", idx, files.len());
            }

            match self.process_file(path, root) {
                FileOutcome::Indexed(records) => {
                    tracing::debug!("Indexed {} ({} chunks)", path.display(), records.len());
                    for record in records {
                        batch.push(record);
                        result.total_chunks += 1;
                        if batch.len() >= batch_size {
                            batch.flush(collection)?;
                        }
                    }
                    result.files_indexed += 1;
                }
                FileOutcome::Skipped(reason) => {
                    result.files_skipped += 1;
                    if reason.is_reported() {
                        let message = format!("Skipped {}: {}", path.display(), reason);
                        tracing::warn!("{}", message);
                        result.errors.push(message);
                    } else {
                        tracing::debug!("Skipped ({}): {}", reason, path.display());
                    }
                }
                FileOutcome::Failed(error) => {
                    let message = format!("Error indexing {}: {}", path.display(), error);
                    tracing::error!("{}", message);
                    result.errors.push(message);
                    result.files_skipped += 1;
                }
            }
        }

        batch.flush(collection)?;
        Ok(result)
    }

    /// Read, describe and chunk one file under `root`
    pub fn process_file(&self, path: &Path, root: &Path) -> FileOutcome {
        let (text, hash, encoding) = match self.reader.read(path) {
            ReadOutcome::Text {
                text,
                hash,
                encoding,
            } => (text, hash, encoding),
            ReadOutcome::Skipped { reason, .. } => return FileOutcome::Skipped(reason),
        };

        if text.trim().is_empty() {
            return FileOutcome::Skipped(SkipReason::Empty);
        }

        let source = match file_metadata(path, &hash, Some(encoding)) {
            Ok(meta) => Arc::new(meta),
            Err(e) => return FileOutcome::Failed(e.to_string()),
        };

        let records = self
            .chunker
            .chunk(&text, Some(source))
            .into_iter()
            .map(|chunk| ChunkRecord {
                id: chunk_id(path, root, &hash, chunk.metadata.chunk_index),
                metadata: chunk.flatten(),
                text: chunk.text,
            })
            .collect();

        FileOutcome::Indexed(records)
    }

    pub fn get_collection_stats(&self, collection_name: &str) -> Result<CollectionStats> {
        collection_stats(self.store.as_ref(), collection_name)
    }
}

/// Chunk count plus language and file-type tallies over a record sample
pub fn collection_stats(
    store: &dyn DocumentStore,
    collection_name: &str,
) -> Result<CollectionStats> {
    let collection = store.get_collection(collection_name)?;
    let total_chunks = collection.count()?;
    let sample = collection.get(total_chunks.min(STATS_SAMPLE_SIZE))?;

    let mut languages = BTreeMap::new();
    let mut file_types = BTreeMap::new();
    for record in &sample {
        if let Some(language) = record.metadata.get("language").and_then(|v| v.as_str()) {
            *languages.entry(language.to_string()).or_insert(0) += 1;
        }
        if let Some(ext) = record.metadata.get("file_ext").and_then(|v| v.as_str()) {
            *file_types.entry(ext.to_string()).or_insert(0) += 1;
        }
    }

    Ok(CollectionStats {
        name: collection_name.to_string(),
        total_chunks,
        languages,
        file_types,
        sample_size: sample.len(),
        metadata: collection.metadata(),
    })
}
