//! File-level metadata extraction.

use crate::core::error::Result;
use crate::core::language;
use crate::core::types::FileMetadata;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use super::TextEncoding;

/// Stat `path` and build its metadata record.
///
/// `encoding` is the encoding that decoded the file, when known.
pub fn file_metadata(
    path: &Path,
    file_hash: &str,
    encoding: Option<TextEncoding>,
) -> Result<FileMetadata> {
    let stat = fs::metadata(path)?;
    let modified_time = stat
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    let file_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    Ok(FileMetadata {
        file_path: path.display().to_string(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        language: language::language_for_extension(&file_ext).to_string(),
        file_ext,
        file_size: stat.len(),
        modified_time,
        file_hash: file_hash.to_string(),
        git_repo_path: git_relative_path(path),
        encoding: encoding.map(|e| e.name().to_string()),
    })
}

/// Path of `file` relative to the nearest ancestor containing `.git`
fn git_relative_path(file: &Path) -> Option<String> {
    file.ancestors()
        .skip(1)
        .find(|dir| dir.join(".git").exists())
        .and_then(|root| file.strip_prefix(root).ok())
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
