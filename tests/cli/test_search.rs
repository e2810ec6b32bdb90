//! Tests for the search CLI command
//!
//! - Valid queries in both output formats
//! - Missing collections and invalid queries

use crate::cli::test_helpers::setup_indexed_collection;
use crate::common::create_test_services;
use ragdex::cli::commands::search::{execute, SearchArgs};
use ragdex::cli::OutputFormat;

fn search_args(query: &str, collection: &str, n_results: usize) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        collection: collection.to_string(),
        n_results,
    }
}

#[tokio::test]
async fn test_search_valid_query_human() {
    let (services, _db) = create_test_services();
    let _repo = setup_indexed_collection(&services, "search-test");

    let result = execute(
        search_args("println hello", "search-test", 3),
        &services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_valid_query_json() {
    let (services, _db) = create_test_services();
    let _repo = setup_indexed_collection(&services, "json-test");

    let args = search_args("User class", "json-test", 5);
    let result = execute(args, &services, OutputFormat::Json).await;

    assert!(result.is_ok(), "JSON search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_collection_not_found() {
    let (services, _db) = create_test_services();

    let err = execute(search_args("anything", "missing", 5), &services, OutputFormat::Human)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("'missing' not found"));
    assert!(message.contains("list-collections"));
}

#[tokio::test]
async fn test_search_empty_query() {
    let (services, _db) = create_test_services();
    let _repo = setup_indexed_collection(&services, "empty-query");

    let err = execute(search_args("   ", "empty-query", 5), &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("empty"));
}
