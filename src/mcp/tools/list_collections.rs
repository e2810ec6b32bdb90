//! List collections tool handler

use super::handler::{text_content, McpToolHandler};
use crate::core::services::Services;
use crate::core::types::CollectionSummary;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ListCollectionsHandler {
    services: Arc<Services>,
}

impl ListCollectionsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    fn format_summaries(summaries: &[CollectionSummary]) -> String {
        if summaries.is_empty() {
            return "No collections found".to_string();
        }

        let mut response = format!("Found {} collections:\n", summaries.len());
        for summary in summaries {
            response.push_str(&format!(
                "  - {} ({} documents)\n",
                summary.name, summary.count
            ));
        }
        response
    }
}

#[async_trait]
impl McpToolHandler for ListCollectionsHandler {
    fn name(&self) -> &str {
        "list_collections"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_collections".to_string(),
            description: "List all available collections in the database".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let summaries = self.services.search.list_collections()?;
        tracing::info!("Listed {} collections", summaries.len());
        Ok(text_content(Self::format_summaries(&summaries)))
    }
}
