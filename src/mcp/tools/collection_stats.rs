//! Collection statistics tool handler

use super::handler::{text_content, McpToolHandler};
use super::helpers::{format_metadata, parse_args};
use crate::core::services::Services;
use crate::core::types::CollectionStats;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct StatsRequest {
    collection: String,
}

pub struct CollectionStatsHandler {
    services: Arc<Services>,
}

impl CollectionStatsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    fn format_counts(counts: &BTreeMap<String, usize>) -> String {
        if counts.is_empty() {
            return "none".to_string();
        }
        counts
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_stats(stats: &CollectionStats) -> String {
        let mut message = format!(
            "Collection: {}\n\
             Total chunks: {}\n\
             Languages (sample of {}): {}\n\
             File types: {}",
            stats.name,
            stats.total_chunks,
            stats.sample_size,
            Self::format_counts(&stats.languages),
            Self::format_counts(&stats.file_types),
        );
        if !stats.metadata.is_empty() {
            message.push_str(&format!("\nMetadata: {}", format_metadata(&stats.metadata)));
        }
        message
    }
}

#[async_trait]
impl McpToolHandler for CollectionStatsHandler {
    fn name(&self) -> &str {
        "collection_stats"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collection_stats".to_string(),
            description: "Show chunk count and sampled language and file type breakdown \
                         for a collection"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "collection": {
                        "type": "string",
                        "description": "Collection name"
                    }
                },
                "required": ["collection"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let req: StatsRequest = parse_args(args)?;
        let stats = self.services.collection_stats(&req.collection)?;
        Ok(text_content(Self::format_stats(&stats)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Metadata;

    #[test]
    fn test_format_stats() {
        let mut languages = BTreeMap::new();
        languages.insert("python".to_string(), 3);
        languages.insert("rust".to_string(), 1);

        let stats = CollectionStats {
            name: "code".to_string(),
            total_chunks: 4,
            languages,
            file_types: BTreeMap::new(),
            sample_size: 4,
            metadata: Metadata::new(),
        };

        let output = CollectionStatsHandler::format_stats(&stats);
        assert!(output.contains("Total chunks: 4"));
        assert!(output.contains("Languages (sample of 4): python (3), rust (1)"));
        assert!(output.contains("File types: none"));
        assert!(!output.contains("Metadata:"));
    }
}
