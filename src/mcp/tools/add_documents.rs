//! Add free-form documents to a collection

use super::handler::{text_content, McpToolHandler};
use super::helpers::parse_args;
use crate::core::services::Services;
use crate::core::types::Metadata;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AddRequest {
    collection: String,
    documents: Vec<String>,
    #[serde(default)]
    metadatas: Option<Vec<Metadata>>,
}

pub struct AddDocumentsHandler {
    services: Arc<Services>,
}

impl AddDocumentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for AddDocumentsHandler {
    fn name(&self) -> &str {
        "add_documents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_documents".to_string(),
            description: "Add documents to your knowledge base".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "collection": {"type": "string"},
                    "documents": {
                        "type": "array",
                        "items": {"type": "string"}
                    },
                    "metadatas": {
                        "type": "array",
                        "items": {"type": "object"}
                    }
                },
                "required": ["collection", "documents"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let req: AddRequest = parse_args(args)?;
        let ids = self.services.search.add_documents(
            &req.collection,
            &req.documents,
            req.metadatas.as_deref(),
        )?;

        Ok(text_content(format!(
            "Successfully added {} documents to collection '{}'",
            ids.len(),
            req.collection
        )))
    }
}
