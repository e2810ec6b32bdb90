//! Search command - query a collection

use crate::cli::output::{colors, format_value, truncate_line};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::SearchHit;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Lines of chunk text shown per hit
const PREVIEW_LINES: usize = 5;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Collection to search
    #[arg(long, short = 'c')]
    pub collection: String,

    /// Maximum number of results
    #[arg(long = "n-results", short = 'n', default_value = "5")]
    pub n_results: usize,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub query: String,
    pub collection: String,
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = match services
        .search
        .search(&args.collection, &args.query, Some(args.n_results))
    {
        Ok(results) => results,
        Err(e) if e.is_not_found() => {
            return Err(format!(
                "Collection '{}' not found. Run 'ragdex list-collections' to see available collections.",
                args.collection
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    let output = SearchResponseOutput {
        query: args.query,
        collection: args.collection,
        total_results: results.len(),
        results,
    };

    match format {
        OutputFormat::Human => {
            if output.results.is_empty() {
                println!(
                    "No results found for '{}' in '{}'",
                    colors::label(&output.query),
                    colors::collection(&output.collection)
                );
                return Ok(());
            }

            println!(
                "Found {} result(s) in '{}':\n",
                colors::number(&output.total_results.to_string()),
                colors::collection(&output.collection)
            );

            for hit in &output.results {
                let source = hit
                    .metadata
                    .get("file_path")
                    .map(format_value)
                    .unwrap_or_else(|| hit.id.clone());
                println!(
                    "[{}] {} {}",
                    colors::rank(&hit.rank.to_string()),
                    colors::file_path(&source),
                    colors::score(&format!("(distance: {:.3})", hit.distance))
                );
                for line in hit.text.lines().take(PREVIEW_LINES) {
                    println!("    {}", colors::dim(&truncate_line(line, 100)));
                }
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
