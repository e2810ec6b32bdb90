//! Code-aware chunking.
//!
//! Detects top-level blocks per language family and packs consecutive
//! blocks into chunks. A block is never split, so a function longer
//! than `chunk_size` becomes one oversized chunk. Brace blocks reach back
//! a fixed number of chars for their signature and may therefore overlap
//! the block before them; a chunk that starts with such a block repeats
//! that context. Content with no detectable blocks is chunked exactly as
//! [`FixedSizeChunker`] would.

use super::{assemble, CharText, ChunkParams, FixedSizeChunker, Piece, TokenCounter};
use crate::core::language::{self, LanguageFamily};
use crate::core::types::{DocumentChunk, FileMetadata};
use std::sync::Arc;

/// Chars kept before an opening brace so the signature travels with its body
const SIGNATURE_LOOKBACK: usize = 200;

const DECLARATION_KEYWORDS: [&str; 4] = ["def ", "async def ", "class ", "module "];

#[derive(Debug, Clone)]
pub struct CodeAwareChunker {
    chunk_size: usize,
    language: Option<String>,
    tokens: TokenCounter,
    fallback: FixedSizeChunker,
}

impl CodeAwareChunker {
    pub fn new(params: ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size,
            language: params.language.clone(),
            tokens: params.tokens.clone(),
            fallback: FixedSizeChunker::new(params),
        }
    }

    pub fn chunk(&self, text: &str, source: Option<Arc<FileMetadata>>) -> Vec<DocumentChunk> {
        let language = self.resolve_language(text, source.as_deref());
        let source = source.map(|s| {
            if s.language == language {
                s
            } else {
                Arc::new(s.with_language(&language))
            }
        });

        let doc = CharText::new(text);
        let blocks = match language::family(&language) {
            LanguageFamily::Indentation => indentation_blocks(&doc),
            LanguageFamily::Brace => brace_blocks(&doc),
            LanguageFamily::Plain => Vec::new(),
        };

        if blocks.is_empty() {
            tracing::debug!("No code blocks found for {}, using fixed-size chunks", language);
            return self.fallback.chunk(text, source);
        }

        let pieces = self.pack(&doc, &blocks);
        assemble(pieces, "code_block", Some(&language), &self.tokens, source)
    }

    /// Explicit language, then the extension table, then keyword sniffing
    pub fn resolve_language(&self, text: &str, source: Option<&FileMetadata>) -> String {
        if let Some(language) = &self.language {
            return language.clone();
        }

        let from_ext = source
            .map(|s| language::language_for_extension(&s.file_ext))
            .unwrap_or(language::UNKNOWN);
        if from_ext != language::UNKNOWN {
            return from_ext.to_string();
        }

        language::sniff_language(text)
            .unwrap_or(language::UNKNOWN)
            .to_string()
    }

    fn pack(&self, doc: &CharText, blocks: &[(usize, usize)]) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut current: Option<(Piece, usize)> = None;

        for &(start, end) in blocks {
            let block = doc.slice(start, end);
            let block_len = end - start;

            match current.as_mut() {
                Some((piece, len)) if *len + block_len <= self.chunk_size => {
                    // Extend from the current end: overlap is not repeated, gaps are kept
                    piece.text.push_str(doc.slice(piece.end, end));
                    *len += end - piece.end;
                    piece.end = end;
                }
                _ => {
                    if let Some((piece, _)) = current.take() {
                        pieces.push(piece);
                    }
                    current = Some((
                        Piece {
                            text: block.to_string(),
                            start,
                            end,
                        },
                        block_len,
                    ));
                }
            }
        }

        if let Some((piece, _)) = current {
            pieces.push(piece);
        }

        pieces
    }
}

/// Blocks opened by declaration lines; non-blank text before the first
/// declaration forms its own leading block
fn indentation_blocks(doc: &CharText) -> Vec<(usize, usize)> {
    let mut starts = Vec::new();
    let mut offset = 0;

    for line in doc.as_str().split('\n') {
        let stripped = line.trim_start();
        if DECLARATION_KEYWORDS.iter().any(|k| stripped.starts_with(k)) {
            starts.push(offset);
        }
        offset += line.chars().count() + 1;
    }

    if starts.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 && !doc.slice(0, starts[0]).trim().is_empty() {
        blocks.push((0, starts[0]));
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(doc.len());
        blocks.push((start, end));
    }

    blocks
}

/// Balanced top-level brace regions, each opened `SIGNATURE_LOOKBACK`
/// chars before its brace (clamped to 0)
fn brace_blocks(doc: &CharText) -> Vec<(usize, usize)> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<usize> = None;

    for (i, ch) in doc.as_str().chars().enumerate() {
        match ch {
            '{' => {
                if depth == 0 {
                    open = Some(i.saturating_sub(SIGNATURE_LOOKBACK));
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = open.take() {
                        blocks.push((start, i + 1));
                    }
                }
            }
            _ => {}
        }
    }

    // An unclosed block runs to the end of the document
    if let Some(start) = open {
        blocks.push((start, doc.len()));
    }

    blocks
}
