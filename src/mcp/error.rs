//! MCP-specific error types

use crate::core::error::RagError;
use crate::mcp::protocol::{
    COLLECTION_NOT_FOUND, EMBEDDING_ERROR, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    PARSE_ERROR, STORE_ERROR,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool error (code {0}): {1}")]
    ToolError(i32, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code and message for the wire
    pub fn code_and_message(&self) -> (i32, String) {
        match self {
            McpError::ParseError(msg) => (PARSE_ERROR, msg.clone()),
            McpError::InvalidRequest(msg) => (INVALID_REQUEST, msg.clone()),
            McpError::InvalidParams(msg) => (INVALID_PARAMS, msg.clone()),
            McpError::InternalError(msg) => (INTERNAL_ERROR, msg.clone()),
            McpError::ToolError(code, msg) => (*code, msg.clone()),
            McpError::Io(e) => (INTERNAL_ERROR, format!("I/O error: {e}")),
            McpError::Json(e) => (INTERNAL_ERROR, format!("JSON error: {e}")),
        }
    }
}

impl From<RagError> for McpError {
    fn from(err: RagError) -> Self {
        match &err {
            RagError::CollectionNotFound(_) => {
                McpError::ToolError(COLLECTION_NOT_FOUND, err.to_string())
            }
            RagError::Validation { .. } | RagError::Config { .. } => {
                McpError::InvalidParams(err.with_details())
            }
            RagError::Store { .. } => McpError::ToolError(STORE_ERROR, err.with_details()),
            RagError::Embedding { .. } => McpError::ToolError(EMBEDDING_ERROR, err.with_details()),
            RagError::Io(_) | RagError::Json(_) | RagError::Toml(_) => {
                McpError::InternalError(err.to_string())
            }
        }
    }
}
