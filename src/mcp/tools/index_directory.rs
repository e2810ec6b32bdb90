//! Directory indexing tool handler
//!
//! Implements the index_directory MCP tool: walk a directory, chunk
//! every admitted file and store the chunks in a collection.

use super::handler::{text_content, McpToolHandler};
use super::helpers::{parse_args, run_blocking};
use crate::core::chunking::{ChunkingStrategy, STRATEGY_NAMES};
use crate::core::services::Services;
use crate::core::types::IndexingResult;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema, INDEXING_FAILED};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Per-file errors echoed back to the client
const MAX_ERRORS_SHOWN: usize = 10;

/// Request parameters for index_directory tool
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexRequest {
    /// Absolute path to the directory
    directory: String,
    /// Target collection, defaults to the directory name
    #[serde(default)]
    collection: Option<String>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default)]
    chunking_strategy: Option<String>,
    #[serde(default)]
    chunk_size: Option<usize>,
    #[serde(default)]
    chunk_overlap: Option<usize>,
    #[serde(default = "default_use_ignore_rules")]
    use_ignore_rules: bool,
    #[serde(default)]
    force_reindex: bool,
}

fn default_use_ignore_rules() -> bool {
    true
}

/// Handler for index_directory MCP tool
pub struct IndexDirectoryHandler {
    services: Arc<Services>,
}

impl IndexDirectoryHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// Validate and canonicalize the directory path
    fn validate_path(path: &str) -> Result<PathBuf, McpError> {
        let path = PathBuf::from(path);

        if !path.is_absolute() {
            return Err(McpError::InvalidParams("Path must be absolute".to_string()));
        }

        if !path.exists() {
            return Err(McpError::InvalidParams(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(McpError::InvalidParams(
                "Path must be a directory".to_string(),
            ));
        }

        path.canonicalize()
            .map_err(|e| McpError::InvalidParams(format!("Cannot resolve path: {e}")))
    }

    fn format_result(result: &IndexingResult, strategy: ChunkingStrategy, secs: f64) -> String {
        let mut message = format!(
            "Indexing complete!\n\
             Collection: {}\n\
             Strategy: {}\n\
             Files found: {}\n\
             Files indexed: {}\n\
             Files skipped: {}\n\
             Chunks created: {}\n\
             Duration: {:.1}s",
            result.collection_name,
            strategy,
            result.total_files,
            result.files_indexed,
            result.files_skipped,
            result.total_chunks,
            secs
        );

        if !result.errors.is_empty() {
            message.push_str(&format!("\n\nErrors ({}):", result.errors.len()));
            for error in result.errors.iter().take(MAX_ERRORS_SHOWN) {
                message.push_str(&format!("\n  - {error}"));
            }
            if result.errors.len() > MAX_ERRORS_SHOWN {
                message.push_str(&format!(
                    "\n  ... and {} more",
                    result.errors.len() - MAX_ERRORS_SHOWN
                ));
            }
        }

        message
    }
}

#[async_trait]
impl McpToolHandler for IndexDirectoryHandler {
    fn name(&self) -> &str {
        "index_directory"
    }

    fn runs_blocking(&self) -> bool {
        true
    }

    fn schema(&self) -> ToolSchema {
        let indexing = &self.services.config.indexing;
        ToolSchema {
            name: "index_directory".to_string(),
            description: "Index every text file under a directory into a collection for \
                         search_documents. Honors .mcpignore (falling back to .gitignore) plus \
                         built-in ignore patterns. Runs synchronously and returns file and \
                         chunk counts. Files that cannot be read or decoded are skipped and \
                         listed in the result."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Absolute path to the directory to index"
                    },
                    "collection": {
                        "type": "string",
                        "description": "Collection name (defaults to the directory name)"
                    },
                    "extensions": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Only index files with these extensions (e.g. [\".md\", \".py\"])"
                    },
                    "chunking_strategy": {
                        "type": "string",
                        "enum": STRATEGY_NAMES,
                        "default": indexing.strategy.as_str(),
                        "description": "How files are split into chunks"
                    },
                    "chunk_size": {
                        "type": "integer",
                        "minimum": 1,
                        "default": indexing.chunk_size,
                        "description": "Target characters per chunk"
                    },
                    "chunk_overlap": {
                        "type": "integer",
                        "minimum": 0,
                        "default": indexing.chunk_overlap,
                        "description": "Characters carried over between chunks"
                    },
                    "use_ignore_rules": {
                        "type": "boolean",
                        "default": true,
                        "description": "Apply ignore files and default ignore patterns"
                    },
                    "force_reindex": {
                        "type": "boolean",
                        "default": false,
                        "description": "Delete the collection before indexing"
                    }
                },
                "required": ["directory"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let req: IndexRequest = parse_args(args)?;
        let directory = Self::validate_path(&req.directory)?;

        let collection = match req.collection {
            Some(name) => name,
            None => directory
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    McpError::InvalidParams(
                        "Cannot derive a collection name, pass 'collection'".to_string(),
                    )
                })?,
        };

        let mut options = self.services.indexing_options()?;
        if let Some(strategy) = req.chunking_strategy {
            options.strategy = strategy.parse()?;
        }
        if let Some(size) = req.chunk_size {
            options.chunk_size = size;
        }
        if let Some(overlap) = req.chunk_overlap {
            options.chunk_overlap = overlap;
        }
        if options.chunk_size == 0 {
            return Err(McpError::InvalidParams(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if options.chunk_overlap >= options.chunk_size {
            return Err(McpError::InvalidParams(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                options.chunk_overlap, options.chunk_size
            )));
        }
        options.min_chunk_size = options.min_chunk_size.min(options.chunk_size);

        let strategy = options.strategy;
        let pipeline = self.services.create_pipeline(options);
        let start = Instant::now();

        let result = run_blocking(move || {
            pipeline.index_directory(
                &directory,
                &collection,
                req.extensions.as_deref(),
                req.use_ignore_rules,
                req.force_reindex,
            )
        })
        .await
        .map_err(|e| match e {
            McpError::ToolError(_, message) => McpError::ToolError(INDEXING_FAILED, message),
            other => other,
        })?;

        Ok(text_content(Self::format_result(
            &result,
            strategy,
            start.elapsed().as_secs_f64(),
        )))
    }
}
