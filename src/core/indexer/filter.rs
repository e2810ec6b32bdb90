//! Ignore-rule filtering for directory walks.
//!
//! Patterns come from three sources, later ones taking precedence under
//! gitignore rules: the built-in defaults, the primary ignore file
//! (`.mcpignore`) and the fallback VCS ignore file (`.gitignore`). All of
//! them compile into one [`Gitignore`] matcher rooted at the filter root.

use crate::core::error::{RagError, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Patterns applied when defaults are enabled
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git/",
    ".svn/",
    ".hg/",
    // Dependencies and virtualenvs
    "node_modules/",
    "vendor/",
    "venv/",
    ".venv/",
    "env/",
    "__pycache__/",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".Python",
    // Build artifacts
    "build/",
    "dist/",
    "*.egg-info/",
    ".eggs/",
    "target/",
    "out/",
    "bin/",
    "obj/",
    "dist-newstyle/",
    ".stack-work/",
    "*.hi",
    "*.o",
    "*.dyn_hi",
    "*.dyn_o",
    ".cabal-sandbox/",
    "cabal.sandbox.config",
    ".gradle/",
    ".mvn/",
    // IDE
    ".idea/",
    ".vscode/",
    "*.swp",
    "*.swo",
    "*~",
    ".DS_Store",
    // Caches and temporary files
    "*.tmp",
    "*.temp",
    ".cache/",
    // Logs
    "*.log",
    "logs/",
    // Databases, including vector stores
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    "chroma_db/",
    // Media
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.svg",
    "*.mp4",
    "*.mp3",
    "*.wav",
    "*.avi",
    "*.mov",
    // Archives and documents
    "*.zip",
    "*.tar",
    "*.tar.gz",
    "*.rar",
    "*.7z",
    "*.pdf",
    // Lock files
    "*.lock",
    "package-lock.json",
    "yarn.lock",
    "poetry.lock",
    "Pipfile.lock",
];

const IGNORE_FILE_HEADER: &str = "# MCP Server Ignore File\n\
# This file specifies patterns for files to exclude from indexing\n\
# Syntax is similar to .gitignore\n\n";

/// Construction options for [`PathFilter`]
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub use_defaults: bool,
    /// Primary ignore file, relative to the root
    pub ignore_file_name: String,
    /// Read after the primary file, so its patterns win on conflict
    pub fallback_ignore_file_name: String,
    /// Extra patterns added after the defaults
    pub custom_patterns: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            use_defaults: true,
            ignore_file_name: ".mcpignore".to_string(),
            fallback_ignore_file_name: ".gitignore".to_string(),
            custom_patterns: Vec::new(),
        }
    }
}

/// Filtered-versus-total file counts under a root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub root_path: String,
    pub total_files: usize,
    pub filtered_files: usize,
    pub ignored_files: usize,
    pub ignore_percentage: f64,
}

/// Decides which paths under a root are excluded from indexing
#[derive(Debug)]
pub struct PathFilter {
    root: PathBuf,
    ignore_file_name: String,
    matcher: Gitignore,
    pattern_count: usize,
}

impl PathFilter {
    /// Filter with default options
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(root, FilterOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: FilterOptions) -> Result<Self> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|_| {
            RagError::config_at(
                format!("Root path does not exist: {}", root.display()),
                root,
            )
        })?;

        let mut builder = GitignoreBuilder::new(&root);
        let mut pattern_count = 0;

        if options.use_defaults {
            for pattern in DEFAULT_IGNORE_PATTERNS {
                pattern_count += add_pattern(&mut builder, pattern, None);
            }
        }

        for pattern in &options.custom_patterns {
            pattern_count += add_pattern(&mut builder, pattern, None);
        }

        for name in [&options.ignore_file_name, &options.fallback_ignore_file_name] {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => {
                    let loaded: usize = content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty() && !line.starts_with('#'))
                        .map(|line| add_pattern(&mut builder, line, Some(&path)))
                        .sum();
                    info!("Loaded {} patterns from {}", loaded, path.display());
                    pattern_count += loaded;
                }
                Err(e) => warn!("Failed to load ignore file {}: {}", path.display(), e),
            }
        }

        let matcher = builder.build().map_err(|e| {
            RagError::config_at(format!("Failed to compile ignore patterns: {e}"), &root)
        })?;

        info!("Path filter initialized with {} patterns", pattern_count);

        Ok(Self {
            root,
            ignore_file_name: options.ignore_file_name,
            matcher,
            pattern_count,
        })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// True when `path` is excluded.
    ///
    /// Absolute paths are canonicalized and made relative to the root;
    /// relative paths are taken as already relative to it. Anything that
    /// cannot be expressed under the root is excluded.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if path.is_absolute() {
            let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            match resolved.strip_prefix(&self.root) {
                Ok(rel) => self.matches(rel, resolved.is_dir()),
                Err(_) => true,
            }
        } else {
            self.matches(path, self.root.join(path).is_dir())
        }
    }

    fn matches(&self, rel: &Path, is_dir: bool) -> bool {
        if rel.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel, is_dir)
            .is_ignore()
    }

    /// Files under the root that survive filtering, in walk order.
    ///
    /// Ignored directories are pruned before descent, so nothing below
    /// them is visited. `extensions` entries may carry a leading dot or not.
    pub fn get_filtered_files(
        &self,
        extensions: Option<&[String]>,
        recursive: bool,
    ) -> Vec<PathBuf> {
        let allowed: Option<Vec<String>> = extensions.map(|exts| {
            exts.iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect()
        });

        let mut walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.entry_ignored(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error walking directory: {}", e);
                    continue;
                }
            };

            if !is_file_entry(&entry) {
                continue;
            }
            // A linked file is kept only when its target resolves under the root
            if entry.path_is_symlink() && self.should_ignore(entry.path()) {
                debug!("Skipping link outside root: {}", entry.path().display());
                continue;
            }

            if let Some(allowed) = &allowed {
                let ext = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match ext {
                    Some(ext) if allowed.contains(&ext) => {}
                    _ => continue,
                }
            }

            files.push(entry.into_path());
        }

        info!("Found {} files after filtering", files.len());
        files
    }

    /// Walk entries are already under the canonical root, so their file
    /// type is reused instead of stat'ing again
    fn entry_ignored(&self, entry: &DirEntry) -> bool {
        let ignored = match entry.path().strip_prefix(&self.root) {
            Ok(rel) => self.matches(rel, entry.file_type().is_dir()),
            Err(_) => true,
        };
        if ignored && entry.file_type().is_dir() {
            debug!("Pruning ignored directory: {}", entry.path().display());
        }
        ignored
    }

    /// Write an ignore file at the root, using the defaults when no
    /// patterns are given
    pub fn create_ignore_file(
        &self,
        patterns: Option<&[String]>,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let path = self.root.join(&self.ignore_file_name);

        if path.exists() && !overwrite {
            return Err(RagError::config_at(
                format!("Ignore file already exists: {}", path.display()),
                &path,
            ));
        }

        let lines: Vec<&str> = match patterns {
            Some(patterns) => patterns.iter().map(String::as_str).collect(),
            None => DEFAULT_IGNORE_PATTERNS.to_vec(),
        };

        let mut content = String::from(IGNORE_FILE_HEADER);
        for line in &lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&path, content)?;

        info!("Created ignore file with {} patterns", lines.len());
        Ok(path)
    }

    pub fn get_stats(&self) -> FilterStats {
        let total_files = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(is_file_entry)
            .count();
        let filtered_files = self.get_filtered_files(None, true).len();
        let ignored_files = total_files.saturating_sub(filtered_files);

        let ignore_percentage = if total_files > 0 {
            (ignored_files as f64 / total_files as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        FilterStats {
            root_path: self.root.display().to_string(),
            total_files,
            filtered_files,
            ignored_files,
            ignore_percentage,
        }
    }
}

/// Regular files, plus symlinks whose target is a file
fn is_file_entry(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
    } else {
        entry.file_type().is_file()
    }
}

/// Returns 1 if the pattern was accepted
fn add_pattern(builder: &mut GitignoreBuilder, pattern: &str, from: Option<&Path>) -> usize {
    match builder.add_line(from.map(Path::to_path_buf), pattern) {
        Ok(_) => 1,
        Err(e) => {
            warn!("Ignoring malformed pattern '{}': {}", pattern, e);
            0
        }
    }
}
