//! Tests for collection management CLI commands
//!
//! - list-collections with and without collections
//! - stats for existing and missing collections
//! - delete with --yes

use crate::cli::test_helpers::setup_indexed_collection;
use crate::common::create_test_services;
use ragdex::cli::commands::collections::{execute_delete, execute_list, execute_stats};
use ragdex::cli::commands::{DeleteArgs, StatsArgs};
use ragdex::cli::OutputFormat;

#[tokio::test]
async fn test_list_empty() {
    let (services, _db) = create_test_services();

    assert!(execute_list(&services, OutputFormat::Human).await.is_ok());
    assert!(execute_list(&services, OutputFormat::Json).await.is_ok());
}

#[tokio::test]
async fn test_list_and_stats() {
    let (services, _db) = create_test_services();
    let _repo = setup_indexed_collection(&services, "listed");

    assert!(execute_list(&services, OutputFormat::Human).await.is_ok());

    let args = StatsArgs {
        collection: "listed".to_string(),
    };
    let result = execute_stats(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "{:?}", result.err());
}

#[tokio::test]
async fn test_stats_not_found() {
    let (services, _db) = create_test_services();
    let args = StatsArgs {
        collection: "ghost".to_string(),
    };

    let err = execute_stats(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("'ghost' not found"));
}

#[tokio::test]
async fn test_delete_with_yes() {
    let (services, _db) = create_test_services();
    let _repo = setup_indexed_collection(&services, "to-delete");

    let args = DeleteArgs {
        collection: "to-delete".to_string(),
        yes: true,
    };
    execute_delete(args, &services, OutputFormat::Json)
        .await
        .unwrap();

    assert!(services.search.list_collections().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_not_found() {
    let (services, _db) = create_test_services();
    let args = DeleteArgs {
        collection: "ghost".to_string(),
        yes: true,
    };

    let err = execute_delete(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not found"));
}
