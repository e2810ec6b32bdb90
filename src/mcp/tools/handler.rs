//! Tool handler trait and result helpers

use crate::mcp::error::McpError;
use crate::mcp::protocol::{ContentBlock, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;

/// One MCP tool over the shared services.
///
/// Handlers report failures as [`McpError`]; the protocol layer turns
/// those into JSON-RPC errors, so a successful result always carries
/// the tool's human-readable report.
#[async_trait]
pub trait McpToolHandler: Send + Sync {
    /// Wire name, e.g. "search_documents"
    fn name(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    /// Whether the tool runs on the blocking pool for a whole directory
    fn runs_blocking(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError>;
}

/// Single text block result
pub fn text_content(text: impl Into<String>) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::Text { text: text.into() }],
    }
}
