//! Collection management commands

use crate::cli::output::{colors, print_header, print_metadata};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Collection name
    pub collection: String,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Collection list response
#[derive(Debug, Serialize)]
pub struct CollectionListResponse {
    pub count: usize,
    pub collections: Vec<crate::core::types::CollectionSummary>,
}

fn not_found(collection: &str) -> Box<dyn std::error::Error> {
    format!(
        "Collection '{collection}' not found. Run 'ragdex list-collections' to see available collections."
    )
    .into()
}

/// Execute the list-collections command
pub async fn execute_list(
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let collections = services.search.list_collections()?;
    let response = CollectionListResponse {
        count: collections.len(),
        collections,
    };

    match format {
        OutputFormat::Human => {
            if response.collections.is_empty() {
                println!("No collections found. Create one with 'ragdex index <DIR>'.");
                return Ok(());
            }

            print_header(&format!("Collections ({}):", response.count));
            for summary in &response.collections {
                println!(
                    "  {} ({} documents)",
                    colors::collection(&summary.name),
                    colors::number(&summary.count.to_string())
                );
                if let Some(dir) = summary
                    .metadata
                    .get("indexed_directory")
                    .and_then(|v| v.as_str())
                {
                    println!("    {}", colors::file_path(dir));
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute the stats command
pub async fn execute_stats(
    args: StatsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = match services.collection_stats(&args.collection) {
        Ok(stats) => stats,
        Err(e) if e.is_not_found() => return Err(not_found(&args.collection)),
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Human => {
            print_header(&format!("Collection: {}", stats.name));
            println!(
                "  Total chunks: {}",
                colors::number(&stats.total_chunks.to_string())
            );

            println!("  Languages (sample of {}):", stats.sample_size);
            for (language, count) in &stats.languages {
                println!("    {language}: {}", colors::number(&count.to_string()));
            }

            println!("  File types:");
            for (ext, count) in &stats.file_types {
                println!("    {ext}: {}", colors::number(&count.to_string()));
            }

            if !stats.metadata.is_empty() {
                println!("  Metadata:");
                print_metadata(&stats.metadata, 4);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

/// Execute the delete command
pub async fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Confirmation prompt unless --yes
    if !args.yes {
        print!(
            "Delete collection '{}'? [y/N] ",
            colors::collection(&args.collection)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    match services.delete_collection(&args.collection) {
        Ok(()) => {}
        Err(e) if e.is_not_found() => return Err(not_found(&args.collection)),
        Err(e) => return Err(e.into()),
    }

    match format {
        OutputFormat::Human => {
            println!(
                "{} collection '{}'",
                colors::success("Deleted"),
                colors::collection(&args.collection)
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": true,
                "collection": args.collection
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
