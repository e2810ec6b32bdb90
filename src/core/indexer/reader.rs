//! Single-pass file reading: stat, read once, hash, then decode.

use crate::core::error::{RagError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Code points for cp1252 bytes 0x80..=0x9F; `None` marks undefined bytes
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// A text encoding the reader can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Requires a byte order mark
    Utf16,
    Latin1,
    Cp1252,
}

impl TextEncoding {
    pub const DEFAULT_ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8,
        TextEncoding::Utf16,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
        }
    }

    /// Decode `bytes`, or `None` when they are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf16 => decode_utf16(bytes),
            _ if bytes.contains(&0) => None,
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect(),
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let (payload, little_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, true),
        [0xFE, 0xFF, rest @ ..] => (rest, false),
        _ => return None,
    };
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).ok()
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16" | "utf16" => Ok(TextEncoding::Utf16),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            _ => Err(RagError::validation_with(
                format!("Unknown encoding '{s}'. Available: utf-8, utf-16, latin-1, cp1252"),
                vec![format!("encoding={s}")],
            )),
        }
    }
}

/// Why a file contributed no chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge { size: u64, limit: u64 },
    Unreadable(String),
    Undecodable,
    /// Empty or whitespace-only after decoding
    Empty,
}

impl SkipReason {
    /// Whether the skip is reported in the run's error list
    pub fn is_reported(&self) -> bool {
        !matches!(self, SkipReason::Empty)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { size, limit } => {
                write!(f, "file size {size} bytes exceeds limit of {limit} bytes")
            }
            SkipReason::Unreadable(msg) => write!(f, "could not read file: {msg}"),
            SkipReason::Undecodable => write!(f, "could not decode with any known encoding"),
            SkipReason::Empty => write!(f, "empty file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Text {
        text: String,
        hash: String,
        encoding: TextEncoding,
    },
    /// The hash is kept whenever the bytes could be read
    Skipped {
        reason: SkipReason,
        hash: Option<String>,
    },
}

/// Reads files under a size ceiling with ordered decoding attempts
#[derive(Debug, Clone)]
pub struct FileReader {
    max_file_size: u64,
    encodings: Vec<TextEncoding>,
}

impl FileReader {
    pub fn new(max_file_size: u64, encodings: Vec<TextEncoding>) -> Self {
        Self {
            max_file_size,
            encodings,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn read(&self, path: &Path) -> ReadOutcome {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                return ReadOutcome::Skipped {
                    reason: SkipReason::Unreadable(e.to_string()),
                    hash: None,
                }
            }
        };

        if size > self.max_file_size {
            warn!(
                "Skipping large file: {} ({} bytes)",
                path.display(),
                size
            );
            return ReadOutcome::Skipped {
                reason: SkipReason::TooLarge {
                    size,
                    limit: self.max_file_size,
                },
                hash: hash_streaming(path).ok(),
            };
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return ReadOutcome::Skipped {
                    reason: SkipReason::Unreadable(e.to_string()),
                    hash: None,
                }
            }
        };
        let hash = hash_bytes(&bytes);

        for encoding in &self.encodings {
            if let Some(text) = encoding.decode(&bytes) {
                debug!("Decoded {} as {}", path.display(), encoding);
                return ReadOutcome::Text {
                    text,
                    hash,
                    encoding: *encoding,
                };
            }
        }

        warn!("Could not decode {} with any known encoding", path.display());
        ReadOutcome::Skipped {
            reason: SkipReason::Undecodable,
            hash: Some(hash),
        }
    }
}

/// Hex SHA-256 of in-memory bytes
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn hash_streaming(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
