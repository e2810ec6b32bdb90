//! Similarity search tool handler

use super::handler::{text_content, McpToolHandler};
use super::helpers::{format_metadata, parse_args};
use crate::core::services::Services;
use crate::core::types::SearchHit;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
    collection: String,
    #[serde(default)]
    n_results: Option<usize>,
}

/// Handler for search_documents MCP tool
pub struct SearchDocumentsHandler {
    services: Arc<Services>,
}

impl SearchDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// One `Result i (distance: d)` block per hit
    fn format_results(hits: &[SearchHit]) -> String {
        if hits.is_empty() {
            return "No results found".to_string();
        }

        let mut blocks = Vec::with_capacity(hits.len() * 2);
        for hit in hits {
            blocks.push(format!(
                "Result {} (distance: {:.3}):\n{}\n",
                hit.rank, hit.distance, hit.text
            ));
            if !hit.metadata.is_empty() {
                blocks.push(format!("Metadata: {}\n", format_metadata(&hit.metadata)));
            }
        }
        blocks.join("\n")
    }
}

#[async_trait]
impl McpToolHandler for SearchDocumentsHandler {
    fn name(&self) -> &str {
        "search_documents"
    }

    fn schema(&self) -> ToolSchema {
        let search = &self.services.config.search;
        ToolSchema {
            name: "search_documents".to_string(),
            description: "Search through your personal document collection".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "collection": {
                        "type": "string",
                        "description": "Collection name (e.g., 'research', 'code', 'notes')"
                    },
                    "n_results": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": search.max_k,
                        "default": search.default_k,
                        "description": "Number of results to return"
                    }
                },
                "required": ["query", "collection"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let req: SearchRequest = parse_args(args)?;
        let hits = self
            .services
            .search
            .search(&req.collection, &req.query, req.n_results)?;

        tracing::info!(
            "Search completed: {} results from collection '{}'",
            hits.len(),
            req.collection
        );
        Ok(text_content(Self::format_results(&hits)))
    }
}
