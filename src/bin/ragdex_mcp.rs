//! ragdex MCP (Model Context Protocol) server
//!
//! A stdio-based MCP server that exposes indexing and search over
//! local collections as tools for MCP clients.

use ragdex::core::config::Config;
use ragdex::core::logging;
use ragdex::core::services::Services;
use ragdex::core::xdg::XdgDirs;
use ragdex::mcp::McpServer;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout carries the protocol
    logging::init(false, std::env::var_os("RAGDEX_LOG_JSON").is_some());

    let xdg = XdgDirs::new();
    xdg.log_paths();

    if let Err(e) = xdg.ensure_dirs_exist() {
        eprintln!("Failed to create XDG directories: {e}");
        std::process::exit(1);
    }

    let config = Config::load_with_xdg(&xdg).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });
    config.log_config();

    let services = Services::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize services: {}", e.with_details());
        std::process::exit(1);
    });

    let mut server = McpServer::new(Arc::new(services));

    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
