//! Create-ignore command - write a default .mcpignore file

use crate::cli::output::{colors, print_json, print_success};
use crate::cli::OutputFormat;
use crate::core::indexer::{PathFilter, DEFAULT_IGNORE_PATTERNS};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the create-ignore command
#[derive(Args, Debug)]
pub struct CreateIgnoreArgs {
    /// Directory to write the ignore file into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Replace an existing ignore file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateIgnoreResponse {
    pub path: String,
    pub patterns: usize,
}

/// Execute the create-ignore command
pub fn execute(
    args: CreateIgnoreArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = PathFilter::new(&args.path)?;
    let path = filter.create_ignore_file(None, args.overwrite)?;

    let response = CreateIgnoreResponse {
        path: path.to_string_lossy().into_owned(),
        patterns: DEFAULT_IGNORE_PATTERNS.len(),
    };

    match format {
        OutputFormat::Human => {
            print_success(&format!(
                "Created {} with {} patterns",
                response.path, response.patterns
            ));
            println!(
                "{}",
                colors::dim("Edit it to customize which files are indexed.")
            );
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
