// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Three top-level Python functions, exactly 900 bytes
#[allow(dead_code)]
pub fn python_module_900() -> String {
    let mut source = String::new();
    for name in ["load", "transform", "save"] {
        source.push_str(&format!("def {name}(records):\n"));
        source.push_str(&format!("    \"\"\"{name} the records.\"\"\"\n"));
        source.push_str("    result = []\n");
        source.push_str("    for record in records:\n");
        source.push_str("        result.append(record)\n");
        source.push_str("    return result\n\n");
    }

    // Pad with comment lines up to the target size
    while source.len() < 900 {
        let remaining = 900 - source.len();
        if remaining > 40 {
            source.push_str("    # padding keeps the module at 900 b\n");
        } else {
            source.push_str(&"#".repeat(remaining - 1));
            source.push('\n');
        }
    }
    source
}

/// Synthetic directory tree for indexing tests
#[allow(dead_code)]
pub struct TestRepo {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestRepo {
    /// Create a small mixed-content tree
    #[allow(dead_code)]
    pub fn small() -> Self {
        Self::with_files(&[
            ("src/main.rs", "fn main() {\n    println!(\"Hello\");\n}\n"),
            ("src/lib.rs", "pub fn helper() -> u32 {\n    42\n}\n"),
            (
                "app/models.py",
                "class User:\n    def __init__(self, name):\n        self.name = name\n",
            ),
            (
                "README.md",
                "# Test Project\n\nThis is a test.\n\n## Usage\n\nRun it.\n",
            ),
            (
                "docs/guide.txt",
                "First paragraph of the guide.\n\nSecond paragraph.\n",
            ),
        ])
    }

    /// Create a tree from (relative_path, content) pairs
    #[allow(dead_code)]
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = Self {
            dir,
            files: Vec::new(),
        };
        for (rel, content) in files {
            repo.add_bytes(rel, content.as_bytes());
        }
        repo
    }

    /// Write raw bytes at a relative path, creating parent directories
    #[allow(dead_code)]
    pub fn add_bytes(&mut self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&path, bytes).expect("Failed to write file");
        self.files.push(path.clone());
        path
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
