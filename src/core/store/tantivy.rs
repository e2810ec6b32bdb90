//! Tantivy-backed document store.
//!
//! Each collection is its own Tantivy index. Texts and metadata are
//! stored fields; embeddings are stored base64-encoded and ranked by
//! brute-force cosine distance at query time.

use super::{Collection, DocumentStore, Embedder, ModelRegistry, QueryHit, StoredRecord};
use crate::core::error::{RagError, Result};
use crate::core::store::cosine_distance;
use crate::core::types::Metadata;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::AllQuery;
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

const INFO_FILE: &str = "collection.json";
const INDEX_DIR: &str = "index";
const WRITER_HEAP_BYTES: usize = 50_000_000;
const MAX_NAME_LEN: usize = 64;

/// Collection names are 1-64 chars of `[A-Za-z0-9._-]`, starting alphanumeric
pub fn validate_collection_name(name: &str) -> Result<()> {
    let starts_ok = name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric())
        .unwrap_or(false);
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if name.len() > MAX_NAME_LEN || !starts_ok || !chars_ok {
        return Err(RagError::validation_with(
            format!("Invalid collection name '{name}'"),
            vec![format!(
                "name must be 1-{MAX_NAME_LEN} characters of [A-Za-z0-9._-] starting with a letter or digit"
            )],
        ));
    }
    Ok(())
}

/// Contents of `collection.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionInfo {
    name: String,
    metadata: Metadata,
    embedding_model: String,
    dimensions: usize,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Fields {
    id: Field,
    text: Field,
    metadata: Field,
    embedding: Field,
}

fn create_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("text", TEXT | STORED);
    builder.add_text_field("metadata", STORED);
    builder.add_text_field("embedding", STORED);
    builder.build()
}

fn schema_fields(schema: &Schema, collection: &str) -> Result<Fields> {
    let field = |name: &str| {
        schema.get_field(name).map_err(|e| {
            RagError::store(format!("Missing {name} field: {e}"), collection, "open")
        })
    };
    Ok(Fields {
        id: field("id")?,
        text: field("text")?,
        metadata: field("metadata")?,
        embedding: field("embedding")?,
    })
}

fn encode_embedding(vector: &[f32]) -> String {
    let bytes: Vec<u8> = vector.iter().flat_map(|v| v.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

fn decode_embedding(encoded: &str) -> Option<Vec<f32>> {
    let bytes = STANDARD.decode(encoded).ok()?;
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    )
}

/// One open collection with its single writer
pub struct TantivyCollection {
    info: CollectionInfo,
    embedder: Arc<dyn Embedder>,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: Fields,
}

impl std::fmt::Debug for TantivyCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyCollection")
            .field("name", &self.info.name)
            .field("embedding_model", &self.info.embedding_model)
            .finish()
    }
}

impl TantivyCollection {
    fn create(dir: &Path, info: CollectionInfo, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let name = info.name.clone();
        let index_dir = dir.join(INDEX_DIR);
        fs::create_dir_all(&index_dir)?;

        let index = Index::create_in_dir(&index_dir, create_schema()).map_err(|e| {
            RagError::store(format!("Failed to create index: {e}"), &name, "create")
        })?;

        fs::write(dir.join(INFO_FILE), serde_json::to_string_pretty(&info)?)?;
        info!("Created collection: {}", name);
        Self::from_index(index, info, embedder, "create")
    }

    fn open(dir: &Path, info: CollectionInfo, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let index = Index::open_in_dir(dir.join(INDEX_DIR)).map_err(|e| {
            RagError::store(format!("Failed to open index: {e}"), &info.name, "open")
        })?;
        debug!("Opened collection: {}", info.name);
        Self::from_index(index, info, embedder, "open")
    }

    fn from_index(
        index: Index,
        info: CollectionInfo,
        embedder: Arc<dyn Embedder>,
        operation: &str,
    ) -> Result<Self> {
        let fields = schema_fields(&index.schema(), &info.name)?;

        let writer = index.writer(WRITER_HEAP_BYTES).map_err(|e| {
            RagError::store(format!("Failed to create writer: {e}"), &info.name, operation)
        })?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| {
                RagError::store(format!("Failed to create reader: {e}"), &info.name, operation)
            })?;

        Ok(Self {
            info,
            embedder,
            reader,
            writer: Mutex::new(writer),
            fields,
        })
    }

    fn model_name(&self) -> &str {
        &self.info.embedding_model
    }

    fn store_err(&self, message: String, operation: &str) -> RagError {
        RagError::store(message, &self.info.name, operation)
    }

    fn record(&self, doc: &TantivyDocument) -> StoredRecord {
        let text_of = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let metadata = serde_json::from_str(&text_of(self.fields.metadata)).unwrap_or_default();
        StoredRecord {
            id: text_of(self.fields.id),
            text: text_of(self.fields.text),
            metadata,
        }
    }
}

impl Collection for TantivyCollection {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = self.info.metadata.clone();
        metadata.insert("embedding_model".into(), json!(self.info.embedding_model));
        metadata
    }

    fn add(&self, ids: &[String], texts: &[String], metadatas: &[Metadata]) -> Result<()> {
        if ids.len() != texts.len() || ids.len() != metadatas.len() {
            return Err(RagError::validation_with(
                "ids, texts and metadatas must have the same length",
                vec![format!(
                    "ids={}, texts={}, metadatas={}",
                    ids.len(),
                    texts.len(),
                    metadatas.len()
                )],
            ));
        }
        if ids.is_empty() {
            return Ok(());
        }

        let vectors = self.embedder.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(RagError::embedding(
                format!("Expected {} embeddings, got {}", texts.len(), vectors.len()),
                self.model_name(),
            ));
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| self.store_err("Writer lock poisoned".to_string(), "add"))?;

        for (((id, text), metadata), vector) in ids.iter().zip(texts).zip(metadatas).zip(&vectors)
        {
            writer.delete_term(Term::from_field_text(self.fields.id, id));
            let mut document = TantivyDocument::default();
            document.add_text(self.fields.id, id);
            document.add_text(self.fields.text, text);
            document.add_text(self.fields.metadata, serde_json::to_string(metadata)?);
            document.add_text(self.fields.embedding, encode_embedding(vector));
            writer
                .add_document(document)
                .map_err(|e| self.store_err(format!("Failed to add document: {e}"), "add"))?;
        }

        writer
            .commit()
            .map_err(|e| self.store_err(format!("Failed to commit: {e}"), "add"))?;
        self.reader
            .reload()
            .map_err(|e| self.store_err(format!("Failed to reload reader: {e}"), "add"))?;

        debug!("Added {} records to {}", ids.len(), self.info.name);
        Ok(())
    }

    fn query(&self, text: &str, k: usize) -> Result<Vec<QueryHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(&[text.to_string()])?
            .pop()
            .ok_or_else(|| RagError::embedding("No query embedding returned", self.model_name()))?;

        let searcher = self.reader.searcher();
        let addresses = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(|e| self.store_err(format!("Search failed: {e}"), "query"))?;

        let mut hits = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                self.store_err(format!("Failed to retrieve document: {e}"), "query")
            })?;
            let distance = doc
                .get_first(self.fields.embedding)
                .and_then(|v| v.as_str())
                .and_then(decode_embedding)
                .map(|v| cosine_distance(&query_vector, &v))
                .unwrap_or(1.0);
            let record = self.record(&doc);
            hits.push(QueryHit {
                id: record.id,
                text: record.text,
                metadata: record.metadata,
                distance,
            });
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(k);
        Ok(hits)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.reader.searcher().num_docs() as usize)
    }

    fn get(&self, limit: usize) -> Result<Vec<StoredRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&AllQuery, &TopDocs::with_limit(limit))
            .map_err(|e| self.store_err(format!("Search failed: {e}"), "get"))?;

        top_docs
            .into_iter()
            .map(|(_, address)| {
                let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                    self.store_err(format!("Failed to retrieve document: {e}"), "get")
                })?;
                Ok(self.record(&doc))
            })
            .collect()
    }
}

/// Directory of Tantivy collections.
///
/// Open collections are cached so each one keeps a single writer for
/// the life of the store.
pub struct TantivyStore {
    root: PathBuf,
    registry: Arc<ModelRegistry>,
    open: Mutex<HashMap<String, Arc<TantivyCollection>>>,
}

impl std::fmt::Debug for TantivyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyStore")
            .field("root", &self.root)
            .finish()
    }
}

impl TantivyStore {
    pub fn new(root: impl Into<PathBuf>, registry: Arc<ModelRegistry>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            registry,
            open: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn exists(&self, name: &str) -> bool {
        self.collection_dir(name).join(INFO_FILE).is_file()
    }

    fn read_info(&self, name: &str) -> Result<CollectionInfo> {
        let content = fs::read_to_string(self.collection_dir(name).join(INFO_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn lock_open(
        &self,
        name: &str,
        operation: &str,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<TantivyCollection>>>> {
        self.open
            .lock()
            .map_err(|_| RagError::store("Collection cache lock poisoned", name, operation))
    }

    fn check_model(
        collection: &TantivyCollection,
        embedder: &dyn Embedder,
    ) -> Result<()> {
        if collection.model_name() != embedder.model_name() {
            return Err(RagError::store(
                format!(
                    "Collection uses embedding model '{}', requested '{}'",
                    collection.model_name(),
                    embedder.model_name()
                ),
                &collection.info.name,
                "create",
            ));
        }
        Ok(())
    }
}

impl DocumentStore for TantivyStore {
    fn location(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn get_or_create_collection(
        &self,
        name: &str,
        embedder: Arc<dyn Embedder>,
        metadata: Metadata,
    ) -> Result<Arc<dyn Collection>> {
        validate_collection_name(name)?;
        let mut open = self.lock_open(name, "create")?;

        if let Some(collection) = open.get(name) {
            Self::check_model(collection, embedder.as_ref())?;
            return Ok(Arc::clone(collection) as Arc<dyn Collection>);
        }

        let dir = self.collection_dir(name);
        let collection = if self.exists(name) {
            let info = self.read_info(name)?;
            let collection = TantivyCollection::open(&dir, info, Arc::clone(&embedder))?;
            Self::check_model(&collection, embedder.as_ref())?;
            collection
        } else {
            let info = CollectionInfo {
                name: name.to_string(),
                metadata,
                embedding_model: embedder.model_name().to_string(),
                dimensions: embedder.dimensions(),
                created_at: Utc::now(),
            };
            TantivyCollection::create(&dir, info, embedder)?
        };

        let collection = Arc::new(collection);
        open.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection as Arc<dyn Collection>)
    }

    fn get_collection(&self, name: &str) -> Result<Arc<dyn Collection>> {
        validate_collection_name(name)?;
        let mut open = self.lock_open(name, "open")?;

        if let Some(collection) = open.get(name) {
            return Ok(Arc::clone(collection) as Arc<dyn Collection>);
        }

        if !self.exists(name) {
            return Err(RagError::CollectionNotFound(name.to_string()));
        }

        let info = self.read_info(name)?;
        let embedder = self.registry.acquire(&info.embedding_model)?;
        let collection = Arc::new(TantivyCollection::open(
            &self.collection_dir(name),
            info,
            embedder,
        )?);
        open.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection as Arc<dyn Collection>)
    }

    fn delete_collection(&self, name: &str) -> Result<()> {
        validate_collection_name(name)?;
        let mut open = self.lock_open(name, "delete")?;

        if !self.exists(name) {
            return Err(RagError::CollectionNotFound(name.to_string()));
        }

        open.remove(name);
        fs::remove_dir_all(self.collection_dir(name)).map_err(|e| {
            RagError::store(format!("Failed to remove collection: {e}"), name, "delete")
        })?;

        info!("Deleted collection: {}", name);
        Ok(())
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.exists(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
