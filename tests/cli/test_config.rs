//! Tests for show-config and create-ignore CLI commands

use crate::common::{create_test_services, TestRepo};
use ragdex::cli::commands::config;
use ragdex::cli::commands::ignore;
use ragdex::cli::commands::CreateIgnoreArgs;
use ragdex::cli::OutputFormat;
use ragdex::core::indexer::DEFAULT_IGNORE_PATTERNS;

#[tokio::test]
async fn test_show_config_both_formats() {
    let (services, _db) = create_test_services();

    assert!(config::execute(&services, OutputFormat::Human).await.is_ok());
    assert!(config::execute(&services, OutputFormat::Json).await.is_ok());
}

#[test]
fn test_create_ignore_writes_defaults() {
    let repo = TestRepo::small();
    let args = CreateIgnoreArgs {
        path: repo.path().to_path_buf(),
        overwrite: false,
    };

    ignore::execute(args, OutputFormat::Json).unwrap();

    let content = std::fs::read_to_string(repo.path().join(".mcpignore")).unwrap();
    assert!(content.contains("node_modules/"));
    let patterns = content
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count();
    assert_eq!(patterns, DEFAULT_IGNORE_PATTERNS.len());
}

#[test]
fn test_create_ignore_existing_requires_overwrite() {
    let repo = TestRepo::with_files(&[(".mcpignore", "custom/\n")]);

    let err = ignore::execute(
        CreateIgnoreArgs {
            path: repo.path().to_path_buf(),
            overwrite: false,
        },
        OutputFormat::Human,
    )
    .unwrap_err();
    assert!(err.to_string().contains("already exists"));

    ignore::execute(
        CreateIgnoreArgs {
            path: repo.path().to_path_buf(),
            overwrite: true,
        },
        OutputFormat::Human,
    )
    .unwrap();
    let content = std::fs::read_to_string(repo.path().join(".mcpignore")).unwrap();
    assert!(!content.contains("custom/"));
}
