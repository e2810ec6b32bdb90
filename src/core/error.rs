//! Error types and error handling for ragdex.
//!
//! Errors are distinguished by kind. Each one renders a readable
//! message and exposes a structured `details()` map so adapters
//! (CLI, MCP) can report the operation and collection involved
//! without parsing strings. Per-file soft failures during indexing
//! are not errors; see `indexer::SkipReason`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ragdex operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Main error type for ragdex
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Store error during '{operation}' on '{collection}': {message}")]
    Store {
        message: String,
        collection: String,
        operation: String,
    },

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<String>,
    },

    #[error("Embedding error ({model}): {message}")]
    Embedding { message: String, model: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RagError {
    pub fn config(message: impl Into<String>) -> Self {
        RagError::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        RagError::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn store(
        message: impl Into<String>,
        collection: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        RagError::Store {
            message: message.into(),
            collection: collection.into(),
            operation: operation.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RagError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn validation_with(message: impl Into<String>, errors: Vec<String>) -> Self {
        RagError::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn embedding(message: impl Into<String>, model: impl Into<String>) -> Self {
        RagError::Embedding {
            message: message.into(),
            model: model.into(),
        }
    }

    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RagError::Config { .. } => "config",
            RagError::Store { .. } => "store",
            RagError::CollectionNotFound(_) => "collection_not_found",
            RagError::Validation { .. } => "validation",
            RagError::Embedding { .. } => "embedding",
            RagError::Io(_) => "io",
            RagError::Json(_) => "json",
            RagError::Toml(_) => "toml",
        }
    }

    /// Structured context for logging and programmatic handling
    pub fn details(&self) -> BTreeMap<String, String> {
        let mut details = BTreeMap::new();
        details.insert("kind".to_string(), self.kind().to_string());

        match self {
            RagError::Config {
                path: Some(path), ..
            } => {
                details.insert("path".to_string(), path.display().to_string());
            }
            RagError::Store {
                collection,
                operation,
                ..
            } => {
                details.insert("collection".to_string(), collection.clone());
                details.insert("operation".to_string(), operation.clone());
            }
            RagError::CollectionNotFound(name) => {
                details.insert("collection".to_string(), name.clone());
            }
            RagError::Validation { errors, .. } if !errors.is_empty() => {
                details.insert("validation_errors".to_string(), errors.join("; "));
            }
            RagError::Embedding { model, .. } => {
                details.insert("model".to_string(), model.clone());
            }
            _ => {}
        }

        details
    }

    /// Message followed by the details map, e.g. `msg (collection=docs, operation=add)`
    pub fn with_details(&self) -> String {
        let context: Vec<String> = self
            .details()
            .into_iter()
            .filter(|(k, _)| k != "kind")
            .map(|(k, v)| format!("{k}={v}"))
            .collect();

        if context.is_empty() {
            self.to_string()
        } else {
            format!("{} ({})", self, context.join(", "))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RagError::CollectionNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RagError::Validation { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, RagError::Store { .. })
    }
}
