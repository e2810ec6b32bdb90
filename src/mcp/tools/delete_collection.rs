//! Delete collection tool handler

use super::handler::{text_content, McpToolHandler};
use super::helpers::parse_args;
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct DeleteRequest {
    collection: String,
}

pub struct DeleteCollectionHandler {
    services: Arc<Services>,
}

impl DeleteCollectionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteCollectionHandler {
    fn name(&self) -> &str {
        "delete_collection"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_collection".to_string(),
            description: "Delete a collection from the database".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "collection": {
                        "type": "string",
                        "description": "Name of the collection to delete"
                    }
                },
                "required": ["collection"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let req: DeleteRequest = parse_args(args)?;
        self.services.delete_collection(&req.collection)?;

        tracing::info!("Deleted collection '{}'", req.collection);
        Ok(text_content(format!(
            "Successfully deleted collection '{}'",
            req.collection
        )))
    }
}
