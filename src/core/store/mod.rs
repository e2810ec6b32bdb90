//! Document store abstraction and its Tantivy-backed implementation.
//!
//! # Architecture
//!
//! - **DocumentStore**: creates, opens, lists and deletes collections
//! - **Collection**: upserts records and answers nearest-neighbor queries
//! - **ModelRegistry**: shares loaded embedding models across collections
//!
//! # On-disk layout
//!
//! ```text
//! {db_path}/
//! ├── {collection}/
//! │   ├── collection.json     # Name, metadata, embedding model
//! │   └── index/              # Tantivy index
//! ```

mod embedding;
mod tantivy;

pub use embedding::{
    cosine_distance, local_model, Embedder, HashingEmbedder, ModelRegistry, DEFAULT_MODEL,
};
#[cfg(feature = "local-embeddings")]
pub use embedding::FastEmbedder;
pub use self::tantivy::{validate_collection_name, TantivyStore};

use crate::core::error::Result;
use crate::core::types::Metadata;
use std::path::Path;
use std::sync::Arc;

/// One ranked query result
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
    /// Cosine distance, lower is closer
    pub distance: f32,
}

/// A record as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

pub trait DocumentStore: Send + Sync {
    /// Open `name`, creating it with `metadata` when absent
    fn get_or_create_collection(
        &self,
        name: &str,
        embedder: Arc<dyn Embedder>,
        metadata: Metadata,
    ) -> Result<Arc<dyn Collection>>;

    /// Fails with `CollectionNotFound` when absent
    fn get_collection(&self, name: &str) -> Result<Arc<dyn Collection>>;

    /// Fails with `CollectionNotFound` when absent
    fn delete_collection(&self, name: &str) -> Result<()>;

    /// Collection names, sorted
    fn list_collections(&self) -> Result<Vec<String>>;

    /// On-disk directory holding the collections, if any
    fn location(&self) -> Option<&Path> {
        None
    }
}

pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    fn metadata(&self) -> Metadata;

    /// Upsert; all three slices must have the same length
    fn add(&self, ids: &[String], texts: &[String], metadatas: &[Metadata]) -> Result<()>;

    /// At most `k` hits, closest first
    fn query(&self, text: &str, k: usize) -> Result<Vec<QueryHit>>;

    fn count(&self) -> Result<usize>;

    /// Up to `limit` stored records
    fn get(&self, limit: usize) -> Result<Vec<StoredRecord>>;
}
