//! Chunking strategies.
//!
//! A [`Chunker`] splits one document into an ordered sequence of
//! [`DocumentChunk`]s. The strategy set is closed: fixed-size with
//! sentence snapping, paragraph packing with overlap carry-over, and
//! code-aware block packing that falls back to fixed-size when no
//! blocks are found. "semantic" is accepted as a name and runs the
//! paragraph strategy.
//!
//! All offsets and sizes are measured in characters, so slicing never
//! lands inside a multi-byte UTF-8 sequence.
//!
//! # Example
//!
//! ```
//! use ragdex::core::chunking::{get_chunker, ChunkParams, ChunkingStrategy};
//!
//! let chunker = get_chunker(ChunkingStrategy::Paragraph, ChunkParams::default());
//! let chunks = chunker.chunk("First paragraph.\n\nSecond paragraph.", None);
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].metadata.total_chunks, 1);
//! ```

mod code;
mod fixed;
mod paragraph;
mod tokens;

pub use code::CodeAwareChunker;
pub use fixed::FixedSizeChunker;
pub use paragraph::ParagraphChunker;
pub use tokens::{TokenCounter, TokenizerKind};

use crate::core::error::RagError;
use crate::core::types::{ChunkMetadata, DocumentChunk, FileMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Strategy names accepted by [`ChunkingStrategy::from_str`]
pub const STRATEGY_NAMES: [&str; 4] = ["fixed", "semantic", "code", "paragraph"];

/// Chunking strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    Fixed,
    /// Alias for [`ChunkingStrategy::Paragraph`]
    Semantic,
    #[default]
    Code,
    Paragraph,
}

impl ChunkingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Fixed => "fixed",
            ChunkingStrategy::Semantic => "semantic",
            ChunkingStrategy::Code => "code",
            ChunkingStrategy::Paragraph => "paragraph",
        }
    }

    /// True when the name selects another strategy's algorithm
    pub fn is_alias(&self) -> bool {
        matches!(self, ChunkingStrategy::Semantic)
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(ChunkingStrategy::Fixed),
            "semantic" => Ok(ChunkingStrategy::Semantic),
            "code" => Ok(ChunkingStrategy::Code),
            "paragraph" => Ok(ChunkingStrategy::Paragraph),
            _ => Err(RagError::validation_with(
                format!(
                    "Unknown chunking strategy '{}'. Available: {}",
                    s,
                    STRATEGY_NAMES.join(", ")
                ),
                vec![format!("strategy={s}")],
            )),
        }
    }
}

/// Size parameters shared by every strategy
#[derive(Debug, Clone)]
pub struct ChunkParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
    /// Explicit language for the code-aware strategy
    pub language: Option<String>,
    pub tokens: TokenCounter,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 100,
            language: None,
            tokens: TokenCounter::Characters,
        }
    }
}

impl ChunkParams {
    pub fn new(chunk_size: usize, chunk_overlap: usize, min_chunk_size: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            min_chunk_size,
            ..Self::default()
        }
    }

    pub fn with_tokens(mut self, tokens: TokenCounter) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A constructed chunking strategy
#[derive(Debug, Clone)]
pub enum Chunker {
    Fixed(FixedSizeChunker),
    Paragraph(ParagraphChunker),
    Code(CodeAwareChunker),
}

impl Chunker {
    /// Split `text` into chunks; empty text yields no chunks
    pub fn chunk(&self, text: &str, source: Option<Arc<FileMetadata>>) -> Vec<DocumentChunk> {
        match self {
            Chunker::Fixed(c) => c.chunk(text, source),
            Chunker::Paragraph(c) => c.chunk(text, source),
            Chunker::Code(c) => c.chunk(text, source),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chunker::Fixed(_) => "fixed",
            Chunker::Paragraph(_) => "paragraph",
            Chunker::Code(_) => "code",
        }
    }
}

/// Build the chunker for a strategy
pub fn get_chunker(strategy: ChunkingStrategy, params: ChunkParams) -> Chunker {
    match strategy {
        ChunkingStrategy::Fixed => Chunker::Fixed(FixedSizeChunker::new(params)),
        ChunkingStrategy::Paragraph => Chunker::Paragraph(ParagraphChunker::new(params)),
        ChunkingStrategy::Semantic => {
            tracing::warn!("Semantic chunking not yet implemented, using paragraph chunking");
            Chunker::Paragraph(ParagraphChunker::new(params))
        }
        ChunkingStrategy::Code => Chunker::Code(CodeAwareChunker::new(params)),
    }
}

/// Char-indexed view over a document
pub(crate) struct CharText<'a> {
    text: &'a str,
    /// Byte offset of each char, plus a trailing `text.len()`
    offsets: Vec<usize>,
}

impl<'a> CharText<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn as_str(&self) -> &'a str {
        self.text
    }

    /// Slice by char positions `[start, end)`
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.offsets[start]..self.offsets[end]]
    }

    /// Char position of a byte offset that lies on a char boundary
    pub(crate) fn char_pos(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&b| b < byte)
    }

    /// Narrow `[start, end)` to exclude surrounding whitespace
    pub(crate) fn trim_span(&self, start: usize, end: usize) -> (usize, usize) {
        let slice = self.slice(start, end);
        let leading = slice.len() - slice.trim_start().len();
        let trailing = slice.len() - slice.trim_end().len();
        let base = self.offsets[start];
        let s = self.char_pos(base + leading);
        let e = self.char_pos(self.offsets[end] - trailing);
        if s >= e {
            (start, start)
        } else {
            (s, e)
        }
    }
}

/// Chunk text and span before indices are assigned
#[derive(Debug, Clone)]
pub(crate) struct Piece {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Assign contiguous indices and the final total once every piece is known
pub(crate) fn assemble(
    pieces: Vec<Piece>,
    chunk_type: &str,
    language: Option<&str>,
    tokens: &TokenCounter,
    source: Option<Arc<FileMetadata>>,
) -> Vec<DocumentChunk> {
    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(index, piece)| DocumentChunk {
            metadata: ChunkMetadata {
                chunk_index: index,
                total_chunks: total,
                char_start: piece.start,
                char_end: piece.end,
                token_count: Some(tokens.count(&piece.text)),
                language: language.map(str::to_string),
                chunk_type: chunk_type.to_string(),
            },
            text: piece.text,
            source: source.clone(),
        })
        .collect()
}
