//! Unified service container for ragdex
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::{collection_stats, IndexingOptions, IndexingPipeline};
use crate::core::search::SearchService;
use crate::core::store::{DocumentStore, ModelRegistry, TantivyStore};
use crate::core::types::CollectionStats;
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access. The store and
/// the model registry are created once and shared by every pipeline.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Loaded embedding models
    pub registry: Arc<ModelRegistry>,

    /// Collection storage
    pub store: Arc<dyn DocumentStore>,

    /// Queries and direct document writes
    pub search: Arc<SearchService>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Result<Self> {
        let registry = Arc::new(ModelRegistry::new());
        let store: Arc<dyn DocumentStore> = Arc::new(TantivyStore::new(
            config.storage.db_path.clone(),
            Arc::clone(&registry),
        )?);

        let search = Arc::new(SearchService::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.embedding.model_name.clone(),
            &config.search,
        ));

        Ok(Self {
            config: Arc::new(config),
            registry,
            store,
            search,
        })
    }

    /// Indexing options derived from the loaded configuration
    pub fn indexing_options(&self) -> Result<IndexingOptions> {
        IndexingOptions::from_config(&self.config)
    }

    /// Create an IndexingPipeline sharing this container's store and models
    ///
    /// Pipelines are created per request since chunking options vary.
    pub fn create_pipeline(&self, options: IndexingOptions) -> IndexingPipeline {
        IndexingPipeline::new(Arc::clone(&self.store), Arc::clone(&self.registry), options)
    }

    pub fn collection_stats(&self, name: &str) -> Result<CollectionStats> {
        collection_stats(self.store.as_ref(), name)
    }

    pub fn delete_collection(&self, name: &str) -> Result<()> {
        self.store.delete_collection(name)
    }
}
