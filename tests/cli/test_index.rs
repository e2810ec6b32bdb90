//! Tests for the index CLI command
//!
//! - Default collection naming
//! - Option validation before any work is done
//! - Force reindexing and extension filters

use crate::cli::test_helpers::index_args;
use crate::common::{create_test_services, TestRepo};
use ragdex::cli::commands::index::{default_collection_name, execute};
use ragdex::cli::OutputFormat;
use std::path::Path;

#[tokio::test]
async fn test_index_human_output() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    let args = index_args(repo.path(), Some("cli-index"));
    let result = execute(args, &services, OutputFormat::Human).await;

    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());
    let stats = services.collection_stats("cli-index").unwrap();
    assert!(stats.total_chunks >= 5);
}

#[tokio::test]
async fn test_index_json_with_strategy_and_extensions() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    let mut args = index_args(repo.path(), Some("json-index"));
    args.strategy = Some("paragraph".to_string());
    args.extensions = vec!["md".to_string(), ".txt".to_string()];
    args.chunk_size = Some(200);
    args.chunk_overlap = Some(20);

    let result = execute(args, &services, OutputFormat::Json).await;

    assert!(result.is_ok(), "{:?}", result.err());
    let stats = services.collection_stats("json-index").unwrap();
    assert_eq!(stats.file_types.len(), 2);
    assert!(stats.file_types.contains_key(".md"));
}

#[tokio::test]
async fn test_index_defaults_collection_to_directory_name() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::with_files(&[("project/notes.txt", "Notes for the project.\n")]);
    let dir = repo.path().join("project");

    execute(index_args(&dir, None), &services, OutputFormat::Json)
        .await
        .unwrap();

    assert!(services.collection_stats("project").is_ok());
}

#[tokio::test]
async fn test_index_rejects_unknown_strategy() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    let mut args = index_args(repo.path(), Some("bad-strategy"));
    args.strategy = Some("recursive".to_string());

    let err = execute(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("paragraph"));
    assert!(services.search.list_collections().unwrap().is_empty());
}

#[tokio::test]
async fn test_index_rejects_overlap_not_below_size() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    let mut args = index_args(repo.path(), Some("bad-overlap"));
    args.chunk_size = Some(100);
    args.chunk_overlap = Some(100);

    let err = execute(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Overlap"));
}

#[tokio::test]
async fn test_index_rejects_missing_path_and_files() {
    let (services, db) = create_test_services();

    let missing = execute(
        index_args(&db.path().join("missing"), Some("x")),
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(missing.unwrap_err().to_string().contains("Invalid path"));

    let repo = TestRepo::with_files(&[("file.txt", "content\n")]);
    let not_dir = execute(
        index_args(&repo.path().join("file.txt"), Some("x")),
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(not_dir.unwrap_err().to_string().contains("not a directory"));
}

#[tokio::test]
async fn test_index_rejects_invalid_collection_name() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    let err = execute(index_args(repo.path(), Some("no spaces")), &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid collection name"));
}

#[tokio::test]
async fn test_index_force_replaces_collection() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    execute(index_args(repo.path(), Some("forced")), &services, OutputFormat::Json)
        .await
        .unwrap();
    let before = services.collection_stats("forced").unwrap().total_chunks;

    let mut args = index_args(repo.path(), Some("forced"));
    args.force = true;
    execute(args, &services, OutputFormat::Json).await.unwrap();

    assert_eq!(services.collection_stats("forced").unwrap().total_chunks, before);
}

#[test]
fn test_default_collection_name() {
    assert_eq!(
        default_collection_name(Path::new("/home/user/my-repo")).as_deref(),
        Some("my-repo")
    );
    assert_eq!(default_collection_name(Path::new("/")), None);
}
