// Ignore-rule tests against real directory trees

use crate::common::TestRepo;
use ragdex::core::indexer::{FilterOptions, PathFilter, DEFAULT_IGNORE_PATTERNS};

fn names(files: &[std::path::PathBuf], root: &std::path::Path) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_nested_node_modules_is_pruned() {
    let repo = TestRepo::with_files(&[
        ("web/index.js", "export const a = 1;\n"),
        ("web/node_modules/pkg/index.js", "module.exports = {};\n"),
        ("web/node_modules/pkg/deep/sentinel.js", "sentinel\n"),
    ]);

    let filter = PathFilter::new(repo.path()).unwrap();
    let root = filter.root().to_path_buf();
    let files = names(&filter.get_filtered_files(None, true), &root);

    assert_eq!(files, vec!["web/index.js".to_string()]);
}

#[test]
fn test_ignore_file_and_gitignore_are_combined() {
    let repo = TestRepo::with_files(&[
        (".mcpignore", "secrets/\n"),
        (".gitignore", "*.generated.rs\n"),
        ("src/lib.rs", "pub fn a() {}\n"),
        ("src/schema.generated.rs", "// generated\n"),
        ("secrets/key.txt", "hunter2\n"),
    ]);

    let filter = PathFilter::new(repo.path()).unwrap();
    let root = filter.root().to_path_buf();
    let extensions = ["rs".to_string(), ".txt".to_string()];
    let files = names(&filter.get_filtered_files(Some(&extensions), true), &root);

    assert_eq!(files, vec!["src/lib.rs".to_string()]);
    assert!(filter.should_ignore(std::path::Path::new("secrets/key.txt")));
    assert!(!filter.should_ignore(std::path::Path::new("src/lib.rs")));
}

#[test]
fn test_negation_in_ignore_file_wins_over_defaults() {
    let repo = TestRepo::with_files(&[
        (".mcpignore", "!important.log\n"),
        ("debug.log", "noise\n"),
        ("important.log", "keep me\n"),
    ]);

    let filter = PathFilter::new(repo.path()).unwrap();

    assert!(filter.should_ignore(std::path::Path::new("debug.log")));
    assert!(!filter.should_ignore(std::path::Path::new("important.log")));
}

#[test]
fn test_defaults_disabled_keeps_vcs_files() {
    let repo = TestRepo::with_files(&[
        ("main.py", "print('hi')\n"),
        ("build/out.py", "x = 1\n"),
    ]);

    let options = FilterOptions {
        use_defaults: false,
        ..FilterOptions::default()
    };
    let filter = PathFilter::with_options(repo.path(), options).unwrap();

    assert_eq!(filter.get_filtered_files(None, true).len(), 2);
    assert_eq!(filter.pattern_count(), 0);
}

#[test]
fn test_non_recursive_walk() {
    let repo = TestRepo::small();
    repo_add_top_level(&repo);

    let filter = PathFilter::new(repo.path()).unwrap();
    let root = filter.root().to_path_buf();
    let files = names(&filter.get_filtered_files(None, false), &root);

    assert_eq!(files, vec!["README.md".to_string(), "top.txt".to_string()]);
}

fn repo_add_top_level(repo: &TestRepo) {
    std::fs::write(repo.path().join("top.txt"), "top level\n").unwrap();
}

#[test]
fn test_create_ignore_file_refuses_overwrite() {
    let repo = TestRepo::small();
    let filter = PathFilter::new(repo.path()).unwrap();

    let path = filter.create_ignore_file(None, false).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with('#'));
    for pattern in DEFAULT_IGNORE_PATTERNS {
        assert!(content.lines().any(|l| l == *pattern), "missing {pattern}");
    }

    let err = filter.create_ignore_file(None, false).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    let custom = vec!["*.bak".to_string()];
    filter.create_ignore_file(Some(&custom), true).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.lines().any(|l| l == "*.bak"));
    assert!(!content.lines().any(|l| l == "node_modules/"));
}

#[test]
fn test_stats_report_ignored_share() {
    let repo = TestRepo::with_files(&[
        ("keep.txt", "keep\n"),
        ("drop.log", "drop\n"),
    ]);

    let stats = PathFilter::new(repo.path()).unwrap().get_stats();

    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.filtered_files, 1);
    assert_eq!(stats.ignored_files, 1);
    assert_eq!(stats.ignore_percentage, 50.0);
}
