//! CLI test helpers
//!
//! Argument builders matching the clap structs, plus a shortcut for
//! indexing a tree before exercising read-only commands.

use crate::common::{index_test_directory, TestRepo};
use ragdex::cli::commands::IndexArgs;
use ragdex::core::services::Services;
use std::path::Path;

/// Index args with every optional flag unset
pub fn index_args(path: &Path, collection: Option<&str>) -> IndexArgs {
    IndexArgs {
        path: path.to_path_buf(),
        collection: collection.map(str::to_string),
        extensions: Vec::new(),
        strategy: None,
        chunk_size: None,
        chunk_overlap: None,
        batch_size: None,
        force: false,
        no_ignore: false,
    }
}

/// Index the small fixture tree into `collection`
pub fn setup_indexed_collection(services: &Services, collection: &str) -> TestRepo {
    let repo = TestRepo::small();
    index_test_directory(services, repo.path(), collection);
    repo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::create_test_services;

    #[test]
    fn test_setup_indexed_collection() {
        let (services, _db) = create_test_services();
        let _repo = setup_indexed_collection(&services, "helper-test");

        let listed = services.search.list_collections().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].count > 0);
    }
}
