// End-to-end indexing tests

use crate::common::{
    assert_valid_result, create_test_services, index_test_directory, index_with_options,
    python_module_900, TestRepo,
};
use ragdex::core::chunking::{ChunkingStrategy, TokenizerKind};
use ragdex::core::indexer::ChunkId;

fn code_options(
    services: &ragdex::Services,
    chunk_size: usize,
) -> ragdex::core::indexer::IndexingOptions {
    let mut options = services.indexing_options().unwrap();
    options.strategy = ChunkingStrategy::Code;
    options.chunk_size = chunk_size;
    options.chunk_overlap = 50;
    options.min_chunk_size = 20;
    options.tokenizer = TokenizerKind::Characters;
    options
}

#[test]
fn test_python_module_with_git_directory() {
    let (services, _db) = create_test_services();
    let source = python_module_900();
    assert_eq!(source.len(), 900);

    let repo = TestRepo::with_files(&[
        ("a.py", source.as_str()),
        (".git/config", "[core]\n\trepositoryformatversion = 0\n"),
    ]);

    let options = code_options(&services, 500);
    let result = index_with_options(&services, repo.path(), "pymod", options);

    assert_eq!(result.total_files, 1, ".git must be pruned from the walk");
    assert_eq!(result.files_indexed, 1);
    assert_eq!(result.files_skipped, 0);
    assert!(result.errors.is_empty());
    assert!(result.total_chunks >= 1);
    assert_eq!(result.collection_name, "pymod");

    let collection = services.store.get_collection("pymod").unwrap();
    let records = collection.get(100).unwrap();
    assert_eq!(records.len(), result.total_chunks);
    for record in &records {
        assert_eq!(record.metadata["language"], "python");
        assert_eq!(record.metadata["file_name"], "a.py");
        assert!(record.text.starts_with("def "));

        let id = ChunkId::parse(&record.id).unwrap();
        assert_eq!(id.path, "a.py");
        assert_eq!(id.hash8.len(), 8);
    }
}

#[test]
fn test_small_repo_indexes_every_file() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    let result = index_test_directory(&services, repo.path(), "small");

    assert_valid_result(&result);
    assert_eq!(result.total_files, 5);
    assert_eq!(result.files_indexed, 5);
    let stored = services.store.get_collection("small").unwrap().count().unwrap();
    assert_eq!(stored, result.total_chunks);
}

#[test]
fn test_undecodable_file_is_skipped_and_reported() {
    let (services, _db) = create_test_services();
    let mut repo = TestRepo::with_files(&[("good.txt", "Plain readable text.\n")]);
    repo.add_bytes("corrupt.txt", b"abc\x00\x01\x02def");

    let result = index_test_directory(&services, repo.path(), "mixed");

    assert_eq!(result.total_files, 2);
    assert_eq!(result.files_indexed, 1);
    assert_eq!(result.files_skipped, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("corrupt.txt"));
}

#[test]
fn test_empty_file_is_skipped_silently() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::with_files(&[("blank.txt", "   \n\n"), ("notes.txt", "Some notes.\n")]);

    let result = index_test_directory(&services, repo.path(), "blank");

    assert_eq!(result.files_indexed, 1);
    assert_eq!(result.files_skipped, 1);
    assert!(result.errors.is_empty());
}

#[test]
fn test_extension_filter() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    let options = services.indexing_options().unwrap();
    let extensions = vec![".rs".to_string()];

    let result = services
        .create_pipeline(options)
        .index_directory(repo.path(), "rust-only", Some(&extensions), true, false)
        .unwrap();

    assert_eq!(result.total_files, 2);
    assert_eq!(result.files_indexed, 2);
}

#[test]
fn test_force_reindex_keeps_count_stable() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();
    let options = services.indexing_options().unwrap();
    let pipeline = services.create_pipeline(options);

    let first = pipeline
        .index_directory(repo.path(), "again", None, true, false)
        .unwrap();
    let second = pipeline
        .index_directory(repo.path(), "again", None, true, true)
        .unwrap();

    assert_eq!(first.total_chunks, second.total_chunks);
    let count = services.store.get_collection("again").unwrap().count().unwrap();
    assert_eq!(count, second.total_chunks);
}

#[test]
fn test_reindex_without_force_upserts() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    let first = index_test_directory(&services, repo.path(), "upsert");
    index_test_directory(&services, repo.path(), "upsert");

    let count = services.store.get_collection("upsert").unwrap().count().unwrap();
    assert_eq!(count, first.total_chunks);
}

#[test]
fn test_multibyte_content_positions() {
    let (services, _db) = create_test_services();
    let text = "日本語のテキスト。".repeat(300) + "\n\némoji 🚀 façade naïve.\n";
    let repo = TestRepo::with_files(&[("unicode.txt", text.as_str())]);

    let mut options = code_options(&services, 200);
    options.strategy = ChunkingStrategy::Fixed;
    let result = index_with_options(&services, repo.path(), "unicode", options);

    assert_eq!(result.files_indexed, 1);
    assert!(result.total_chunks > 1);

    let total = text.chars().count() as u64;
    let records = services.store.get_collection("unicode").unwrap().get(1000).unwrap();
    for record in &records {
        let start = record.metadata["char_start"].as_u64().unwrap();
        let end = record.metadata["char_end"].as_u64().unwrap();
        assert!(start < end && end <= total);
        assert_eq!(record.text.chars().count() as u64, end - start);
    }
}

#[test]
fn test_missing_directory_fails() {
    let (services, db) = create_test_services();
    let options = services.indexing_options().unwrap();
    let missing = db.path().join("does-not-exist");

    let err = services
        .create_pipeline(options)
        .index_directory(&missing, "missing", None, true, false)
        .unwrap_err();

    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_collection_metadata_records_directory_and_model() {
    let (services, _db) = create_test_services();
    let repo = TestRepo::small();

    index_test_directory(&services, repo.path(), "meta");

    let stats = services.collection_stats("meta").unwrap();
    let indexed = stats.metadata["indexed_directory"].as_str().unwrap();
    assert_eq!(
        std::path::Path::new(indexed),
        repo.path().canonicalize().unwrap()
    );
    assert_eq!(stats.metadata["embedding_model"], "hashing-64");
    assert!(stats.languages.contains_key("rust"));
    assert!(stats.file_types.contains_key(".py"));
}
