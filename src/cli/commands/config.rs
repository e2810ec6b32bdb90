//! Show-config command - print the effective configuration

use crate::cli::output::print_json;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use serde::Serialize;
use std::sync::Arc;

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    #[serde(flatten)]
    pub config: &'a crate::core::config::Config,
}

/// Execute the show-config command
pub async fn execute(
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = services.config.as_ref();
    let config_file = XdgDirs::new().config_file();

    match format {
        OutputFormat::Human => {
            let indexing = &config.indexing;
            println!("Configuration:");
            println!("  config_file: {}", config_file.display());
            println!("  indexing:");
            println!("    strategy: {}", indexing.strategy);
            println!("    chunk_size: {}", indexing.chunk_size);
            println!("    chunk_overlap: {}", indexing.chunk_overlap);
            println!("    min_chunk_size: {}", indexing.min_chunk_size);
            println!("    batch_size: {}", indexing.batch_size);
            println!("    max_file_size_mb: {}", indexing.max_file_size_mb);
            println!("    encodings: {:?}", indexing.encodings);
            println!("    tokenizer: {}", indexing.tokenizer);
            println!("  storage:");
            println!("    db_path: {}", config.storage.db_path.display());
            println!("  embedding:");
            println!("    model_name: {}", config.embedding.model_name);
            println!("  search:");
            println!("    default_k: {}", config.search.default_k);
            println!("    max_k: {}", config.search.max_k);
            println!("    max_query_length: {}", config.search.max_query_length);
            println!("  server:");
            println!("    name: {}", config.server.name);
        }
        OutputFormat::Json => {
            print_json(&ConfigResponse {
                config_file: config_file.to_string_lossy().into_owned(),
                config,
            })?;
        }
    }

    Ok(())
}
