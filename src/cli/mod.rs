//! CLI adapter for ragdex
//!
//! Provides the command-line interface for indexing directories into
//! collections and querying them. This module is parallel to `mcp/`:
//! both depend on `core/` but not on each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      mcp/        |      |      cli/        |
//! | (stdio adapter)  |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragdex - local document indexer for retrieval-augmented generation
///
/// Walk a directory, split files into chunks, store them with embeddings
/// in a named collection and query the collection by similarity.
#[derive(Parser, Debug)]
#[command(name = "ragdex")]
#[command(version)]
#[command(about = "Index local documents for retrieval", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Collection storage directory (overrides config and RAGDEX_DB_PATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory into a collection
    Index(commands::IndexArgs),

    /// Search a collection for similar chunks
    Search(commands::SearchArgs),

    /// List all collections
    #[command(name = "list-collections")]
    ListCollections,

    /// Show statistics for a collection
    Stats(commands::StatsArgs),

    /// Delete a collection and all of its documents
    Delete(commands::DeleteArgs),

    /// Write a .mcpignore file with the default patterns
    #[command(name = "create-ignore")]
    CreateIgnore(commands::CreateIgnoreArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig,

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  ragdex completions bash > ~/.local/share/bash-completion/completions/ragdex
    ///   zsh:   ragdex completions zsh > ~/.zfunc/_ragdex
    ///   fish:  ragdex completions fish > ~/.config/fish/completions/ragdex.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Commands that don't need services
    match cli.command {
        Commands::Completions(args) => return commands::completions::execute(args),
        Commands::CreateIgnore(args) => return commands::ignore::execute(args, cli.format),
        _ => {}
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    xdg.log_paths();

    let mut config = Config::load_with_xdg(&xdg)?;
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = db_path;
    }
    config.log_config();

    let services = Arc::new(Services::new(config)?);

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::ListCollections => {
            commands::collections::execute_list(&services, cli.format).await
        }
        Commands::Stats(args) => {
            commands::collections::execute_stats(args, &services, cli.format).await
        }
        Commands::Delete(args) => {
            commands::collections::execute_delete(args, &services, cli.format).await
        }
        Commands::ShowConfig => commands::config::execute(&services, cli.format).await,
        // Handled above
        Commands::Completions(_) | Commands::CreateIgnore(_) => Ok(()),
    }
}
