//! Name-keyed tool table and dispatch

use super::handler::McpToolHandler;
use super::{
    AddDocumentsHandler, CollectionStatsHandler, DeleteCollectionHandler, IndexDirectoryHandler,
    ListCollectionsHandler, SearchDocumentsHandler,
};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Tools exposed by the server, listed in name order
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn McpToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every ragdex tool over one services container
    pub fn for_services(services: &Arc<Services>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(IndexDirectoryHandler::new(Arc::clone(services))));
        registry.register(Arc::new(SearchDocumentsHandler::new(Arc::clone(services))));
        registry.register(Arc::new(AddDocumentsHandler::new(Arc::clone(services))));
        registry.register(Arc::new(ListCollectionsHandler::new(Arc::clone(services))));
        registry.register(Arc::new(DeleteCollectionHandler::new(Arc::clone(services))));
        registry.register(Arc::new(CollectionStatsHandler::new(Arc::clone(services))));
        registry
    }

    /// Add a handler, replacing any tool with the same name
    pub fn register(&mut self, handler: Arc<dyn McpToolHandler>) {
        let name = handler.name().to_string();
        if self.handlers.insert(name.clone(), handler).is_some() {
            debug!("Replaced tool handler: {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpToolHandler>> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Schemas for `tools/list`
    pub fn list(&self) -> Vec<ToolSchema> {
        self.handlers.values().map(|h| h.schema()).collect()
    }

    /// Run the named tool; an unknown name is an invalid request
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolResult, McpError> {
        let handler = self
            .get(name)
            .ok_or_else(|| McpError::InvalidRequest(format!("Tool not found: {name}")))?;

        let start = Instant::now();
        let result = handler.execute(args).await;
        if handler.runs_blocking() {
            info!(
                "Tool {} finished in {}ms",
                name,
                start.elapsed().as_millis()
            );
        }
        result
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
