// Test helper functions

use ragdex::core::config::Config;
use ragdex::core::indexer::IndexingOptions;
use ragdex::core::services::Services;
use ragdex::core::types::IndexingResult;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Small embedding model so tests stay fast
#[allow(dead_code)]
pub const TEST_MODEL: &str = "hashing-64";

/// Create test services over a temporary store
///
/// Keep the returned TempDir alive for the duration of the test.
#[allow(dead_code)]
pub fn create_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.storage.db_path = temp_dir.path().join("collections");
    config.embedding.model_name = TEST_MODEL.to_string();

    let services = Services::new(config).expect("Failed to create services");
    (Arc::new(services), temp_dir)
}

/// Index `dir` into `collection` with the configured defaults
#[allow(dead_code)]
pub fn index_test_directory(services: &Services, dir: &Path, collection: &str) -> IndexingResult {
    let options = services
        .indexing_options()
        .expect("Failed to build indexing options");
    index_with_options(services, dir, collection, options)
}

/// Index with explicit options
#[allow(dead_code)]
pub fn index_with_options(
    services: &Services,
    dir: &Path,
    collection: &str,
    options: IndexingOptions,
) -> IndexingResult {
    services
        .create_pipeline(options)
        .index_directory(dir, collection, None, true, false)
        .expect("Indexing failed")
}

/// Assert that an indexing result is internally consistent
#[allow(dead_code)]
pub fn assert_valid_result(result: &IndexingResult) {
    assert!(
        result.files_indexed > 0,
        "Expected files_indexed > 0, got {}",
        result.files_indexed
    );
    assert!(
        result.total_chunks >= result.files_indexed,
        "Expected total_chunks ({}) >= files_indexed ({})",
        result.total_chunks,
        result.files_indexed
    );
    assert!(
        result.files_indexed + result.files_skipped <= result.total_files,
        "Indexed + skipped ({} + {}) exceeds total files ({})",
        result.files_indexed,
        result.files_skipped,
        result.total_files
    );
}
