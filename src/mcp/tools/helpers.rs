//! Helper functions for MCP tools

use crate::core::error::RagError;
use crate::core::types::Metadata;
use crate::mcp::error::McpError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize tool arguments, reporting failures as invalid params
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, McpError> {
    serde_json::from_value(args)
        .map_err(|e| McpError::InvalidParams(format!("Invalid parameters: {e}")))
}

/// Run a synchronous core operation off the async runtime
pub async fn run_blocking<F, T>(f: F) -> Result<T, McpError>
where
    F: FnOnce() -> Result<T, RagError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| McpError::InternalError(format!("Task failed: {e}")))?
        .map_err(McpError::from)
}

/// Compact single-line rendering of a metadata map
pub fn format_metadata(metadata: &Metadata) -> String {
    Value::Object(metadata.clone()).to_string()
}
