//! Index command - index a directory into a collection

use crate::cli::output::{colors, format_duration, print_warning};
use crate::cli::OutputFormat;
use crate::core::chunking::ChunkingStrategy;
use crate::core::services::Services;
use crate::core::store::validate_collection_name;
use crate::core::types::IndexingResult;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Errors listed in human output before summarizing the rest
const MAX_ERRORS_SHOWN: usize = 10;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory to index
    pub path: PathBuf,

    /// Collection name (defaults to the directory name)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,

    /// File extensions to include, with or without the dot (repeatable)
    #[arg(long = "extension", short = 'e')]
    pub extensions: Vec<String>,

    /// Chunking strategy: fixed, paragraph, code or semantic
    #[arg(long, short = 's')]
    pub strategy: Option<String>,

    /// Characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters carried over between chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Chunks buffered per store write
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Delete the collection before indexing
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Index files matched by .mcpignore/.gitignore and the default patterns
    #[arg(long)]
    pub no_ignore: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub path: String,
    pub strategy: String,
    #[serde(flatten)]
    pub result: IndexingResult,
    pub duration_secs: f64,
}

/// Collection name derived from a directory path
pub fn default_collection_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.path.canonicalize().map_err(|e| {
        format!(
            "Invalid path '{}': {}. Make sure the path exists and is accessible.",
            args.path.display(),
            e
        )
    })?;

    if !path.is_dir() {
        return Err(format!(
            "Path '{}' is not a directory. Only directories can be indexed.",
            path.display()
        )
        .into());
    }

    let collection = match args.collection {
        Some(name) => name,
        None => default_collection_name(&path).ok_or_else(|| {
            format!(
                "Cannot derive a collection name from '{}'. Pass one with --collection.",
                path.display()
            )
        })?,
    };
    validate_collection_name(&collection)?;

    let mut options = services.indexing_options()?;
    if let Some(strategy) = args.strategy {
        options.strategy = strategy.parse::<ChunkingStrategy>()?;
    }
    if let Some(size) = args.chunk_size {
        options.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        options.chunk_overlap = overlap;
    }
    if let Some(batch) = args.batch_size {
        options.batch_size = batch;
    }

    if options.chunk_size == 0 {
        return Err("Chunk size must be greater than zero.".into());
    }
    if options.batch_size == 0 {
        return Err("Batch size must be greater than zero.".into());
    }
    if options.chunk_overlap >= options.chunk_size {
        return Err(format!(
            "Overlap ({}) must be less than chunk size ({}).",
            options.chunk_overlap, options.chunk_size
        )
        .into());
    }
    options.min_chunk_size = options.min_chunk_size.min(options.chunk_size);

    if options.strategy.is_alias() && format == OutputFormat::Human {
        print_warning("'semantic' currently runs the paragraph strategy");
    }

    if format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into '{}' ({} strategy)...",
            colors::file_path(&path.display().to_string()),
            colors::collection(&collection),
            options.strategy
        );
    }

    let strategy = options.strategy.to_string();
    let extensions = (!args.extensions.is_empty()).then_some(args.extensions);
    let pipeline = services.create_pipeline(options);

    let start = Instant::now();
    let result = pipeline.index_directory(
        &path,
        &collection,
        extensions.as_deref(),
        !args.no_ignore,
        args.force,
    )?;

    let response = IndexResponse {
        path: path.to_string_lossy().into_owned(),
        strategy,
        result,
        duration_secs: start.elapsed().as_secs_f64(),
    };

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &IndexResponse) {
    let result = &response.result;
    println!(
        "{} {} of {} files ({} chunks) into '{}' in {}",
        colors::success("Indexed"),
        colors::number(&result.files_indexed.to_string()),
        colors::number(&result.total_files.to_string()),
        colors::number(&result.total_chunks.to_string()),
        colors::collection(&result.collection_name),
        colors::number(&format_duration(response.duration_secs))
    );

    if result.files_skipped > 0 {
        println!(
            "Skipped: {} files",
            colors::warning(&result.files_skipped.to_string())
        );
    }

    if !result.errors.is_empty() {
        println!("{}", colors::label("Errors:"));
        for error in result.errors.iter().take(MAX_ERRORS_SHOWN) {
            println!("  {}", colors::dim(error));
        }
        if result.errors.len() > MAX_ERRORS_SHOWN {
            println!(
                "  {}",
                colors::dim(&format!(
                    "... and {} more",
                    result.errors.len() - MAX_ERRORS_SHOWN
                ))
            );
        }
    }
}
