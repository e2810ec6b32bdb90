//! Nearest-neighbor search and direct document management.
//!
//! This module provides the SearchService used by both adapters to
//! query collections, add free-form documents and list what is stored.

use crate::core::config::SearchConfig;
use crate::core::error::{RagError, Result};
use crate::core::store::{DocumentStore, ModelRegistry};
use crate::core::types::{CollectionSummary, Metadata, SearchHit};
use std::sync::Arc;
use std::time::Instant;

/// Query and document service over a shared store
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
    registry: Arc<ModelRegistry>,
    model_name: String,
    default_k: usize,
    max_k: usize,
    max_query_length: usize,
}

impl SearchService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: Arc<ModelRegistry>,
        model_name: impl Into<String>,
        search: &SearchConfig,
    ) -> Self {
        Self {
            store,
            registry,
            model_name: model_name.into(),
            default_k: search.default_k,
            max_k: search.max_k,
            max_query_length: search.max_query_length,
        }
    }

    /// Result limit actually used for a requested `k`
    pub fn effective_k(&self, k: Option<usize>) -> usize {
        k.unwrap_or(self.default_k).clamp(1, self.max_k.max(1))
    }

    /// Closest chunks to `query`, best first
    pub fn search(
        &self,
        collection: &str,
        query: &str,
        k: Option<usize>,
    ) -> Result<Vec<SearchHit>> {
        let start = Instant::now();

        if query.trim().is_empty() {
            return Err(RagError::validation("Query cannot be empty"));
        }
        let length = query.chars().count();
        if length > self.max_query_length {
            return Err(RagError::validation_with(
                format!(
                    "Query too long ({length} characters, max {})",
                    self.max_query_length
                ),
                vec![format!("query_length={length}")],
            ));
        }

        let k = self.effective_k(k);
        let handle = self.store.get_collection(collection)?;
        let hits: Vec<SearchHit> = handle
            .query(query, k)?
            .into_iter()
            .enumerate()
            .map(|(i, hit)| SearchHit {
                rank: i + 1,
                id: hit.id,
                text: hit.text,
                metadata: hit.metadata,
                relevance: (1.0 - hit.distance).max(0.0) * 100.0,
                distance: hit.distance,
            })
            .collect();

        tracing::debug!(
            "Search '{}' in {} returned {} hits in {}ms",
            query,
            collection,
            hits.len(),
            start.elapsed().as_millis()
        );
        Ok(hits)
    }

    /// Store free-form documents, creating the collection if needed.
    ///
    /// Ids continue from the collection's current count as `doc_<n>`.
    pub fn add_documents(
        &self,
        collection: &str,
        documents: &[String],
        metadatas: Option<&[Metadata]>,
    ) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Err(RagError::validation("No documents provided"));
        }

        let metadatas: Vec<Metadata> = match metadatas {
            Some(m) if m.len() != documents.len() => {
                return Err(RagError::validation_with(
                    "Number of metadatas must match number of documents",
                    vec![format!("documents={}, metadatas={}", documents.len(), m.len())],
                ));
            }
            Some(m) => m.to_vec(),
            None => vec![Metadata::new(); documents.len()],
        };

        let embedder = self.registry.acquire(&self.model_name)?;
        let handle = self
            .store
            .get_or_create_collection(collection, embedder, Metadata::new())?;

        let offset = handle.count()?;
        let ids: Vec<String> = (0..documents.len())
            .map(|i| format!("doc_{}", offset + i))
            .collect();

        handle.add(&ids, documents, &metadatas)?;
        tracing::info!("Added {} documents to {}", ids.len(), collection);
        Ok(ids)
    }

    pub fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        self.store
            .list_collections()?
            .into_iter()
            .map(|name| {
                let handle = self.store.get_collection(&name)?;
                Ok(CollectionSummary {
                    count: handle.count()?,
                    metadata: handle.metadata(),
                    name,
                })
            })
            .collect()
    }
}
