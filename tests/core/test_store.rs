// Store, search and identity tests through the service container

use crate::common::{create_test_services, index_test_directory, TestRepo};
use ragdex::core::config::Config;
use ragdex::core::indexer::{chunk_id, ChunkId};
use ragdex::core::store::validate_collection_name;
use ragdex::Services;
use serde_json::json;
use std::path::Path;

fn docs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_indexed_code_is_searchable() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    index_test_directory(&services, repo.path(), "searchable");

    let hits = services
        .search
        .search("searchable", "pub fn helper returns 42", Some(3))
        .unwrap();

    assert!(!hits.is_empty());
    assert!(hits.len() <= 3);
    for (i, hit) in hits.iter().enumerate() {
        assert_eq!(hit.rank, i + 1);
        assert!(hit.relevance >= 0.0 && hit.relevance <= 100.0);
        assert!(ChunkId::parse(&hit.id).is_some());
    }
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn test_added_documents_get_sequential_ids() {
    let (services, _db) = create_test_services();
    let mut meta = serde_json::Map::new();
    meta.insert("source".into(), json!("notes"));

    let first = services
        .search
        .add_documents("notes", &docs(&["alpha beta", "gamma delta"]), None)
        .unwrap();
    let second = services
        .search
        .add_documents("notes", &docs(&["epsilon"]), Some(&[meta]))
        .unwrap();

    assert_eq!(first, vec!["doc_0", "doc_1"]);
    assert_eq!(second, vec!["doc_2"]);

    let hits = services.search.search("notes", "epsilon", Some(1)).unwrap();
    assert_eq!(hits[0].id, "doc_2");
    assert_eq!(hits[0].metadata["source"], "notes");
}

#[test]
fn test_collections_survive_reopen() {
    let (services, db) = create_test_services();
    services
        .search
        .add_documents("persisted", &docs(&["kept across restarts"]), None)
        .unwrap();
    let config: Config = (*services.config).clone();
    drop(services);

    let reopened = Services::new(config).unwrap();
    let listed = reopened.search.list_collections().unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "persisted");
    assert_eq!(listed[0].count, 1);
    drop(db);
}

#[test]
fn test_delete_collection() {
    let (services, _db) = create_test_services();
    services
        .search
        .add_documents("doomed", &docs(&["short lived"]), None)
        .unwrap();

    services.delete_collection("doomed").unwrap();

    let err = services.search.search("doomed", "short", None).unwrap_err();
    assert!(err.is_not_found());
    assert!(services.delete_collection("doomed").unwrap_err().is_not_found());
}

#[test]
fn test_stats_for_missing_collection() {
    let (services, _db) = create_test_services();
    assert!(services.collection_stats("nope").unwrap_err().is_not_found());
}

#[test]
fn test_collection_name_rules() {
    for ok in ["docs", "my-repo_2", "v1.0"] {
        assert!(validate_collection_name(ok).is_ok(), "{ok}");
    }
    for bad in ["", "-lead", "has space", "../escape", &"x".repeat(65)] {
        assert!(validate_collection_name(bad).unwrap_err().is_validation(), "{bad}");
    }
}

#[test]
fn test_chunk_id_format() {
    let hash = "deadbeefcafebabe".repeat(4);
    let id = chunk_id(
        Path::new("/repo/src/lib.rs"),
        Path::new("/repo"),
        &hash,
        7,
    );
    assert_eq!(id, "src/lib.rs#deadbeef#chunk_7");

    let parsed = ChunkId::parse("weird#name.rs#0123abcd#chunk_12").unwrap();
    assert_eq!(parsed.path, "weird#name.rs");
    assert_eq!(parsed.hash8, "0123abcd");
    assert_eq!(parsed.index, 12);
}
