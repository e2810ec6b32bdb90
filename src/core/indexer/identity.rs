//! Stable chunk identifiers of the form `relative/path#hash8#chunk_N`.

use std::fmt;
use std::path::Path;

const HASH_PREFIX_LEN: usize = 8;

/// Identifier for chunk `index` of the file at `path`.
///
/// The path is made relative to `root` and always uses forward slashes;
/// a path outside `root` is kept whole.
pub fn chunk_id(path: &Path, root: &Path, file_hash: &str, index: usize) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let hash8: String = file_hash.chars().take(HASH_PREFIX_LEN).collect();

    ChunkId {
        path: rel.join("/"),
        hash8,
        index,
    }
    .to_string()
}

/// Decoded chunk identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkId {
    pub path: String,
    pub hash8: String,
    pub index: usize,
}

impl ChunkId {
    /// Split from the right, so paths containing `#` survive
    pub fn parse(id: &str) -> Option<Self> {
        let mut parts = id.rsplitn(3, '#');
        let index = parts.next()?.strip_prefix("chunk_")?.parse().ok()?;
        let hash8 = parts.next()?.to_string();
        let path = parts.next()?.to_string();
        Some(Self { path, hash8, index })
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}#chunk_{}", self.path, self.hash8, self.index)
    }
}
