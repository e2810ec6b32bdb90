//! Fixed-size chunking with sentence snapping.

use super::{assemble, CharText, ChunkParams, Piece, TokenCounter};
use crate::core::types::{DocumentChunk, FileMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// How far (in chars) around a window end to look for a sentence break
const SNAP_WINDOW: usize = 100;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("static sentence regex"));

/// Sliding-window chunker.
///
/// Windows of `chunk_size` chars advance by `chunk_size - chunk_overlap`.
/// A window end that is not the end of the document snaps to the nearest
/// sentence terminator within 100 chars. Trimmed windows shorter than
/// `min_chunk_size` are dropped.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    min_chunk_size: usize,
    tokens: TokenCounter,
}

impl FixedSizeChunker {
    pub fn new(params: ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size.max(1),
            chunk_overlap: params.chunk_overlap,
            min_chunk_size: params.min_chunk_size,
            tokens: params.tokens,
        }
    }

    pub fn chunk(&self, text: &str, source: Option<Arc<FileMetadata>>) -> Vec<DocumentChunk> {
        let doc = CharText::new(text);

        if doc.is_empty() {
            return Vec::new();
        }

        if doc.len() < self.min_chunk_size {
            let whole = Piece {
                text: text.to_string(),
                start: 0,
                end: doc.len(),
            };
            return assemble(vec![whole], "complete", None, &self.tokens, source);
        }

        assemble(self.pieces(&doc), "fixed", None, &self.tokens, source)
    }

    fn pieces(&self, doc: &CharText) -> Vec<Piece> {
        let len = doc.len();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < len {
            let mut end = (start + self.chunk_size).min(len);

            if end < len {
                if let Some(snapped) = self.sentence_break(doc, start, end) {
                    end = snapped;
                }
            }

            let (s, e) = doc.trim_span(start, end);
            if e - s >= self.min_chunk_size && e > s {
                pieces.push(Piece {
                    text: doc.slice(s, e).to_string(),
                    start: s,
                    end: e,
                });

                let next = end.saturating_sub(self.chunk_overlap);
                start = if next <= start { end } else { next };
            } else {
                start = end;
            }
        }

        pieces
    }

    /// Char position just past the terminator closest to `end`, if any lies
    /// strictly within the snap window and after `start`
    fn sentence_break(&self, doc: &CharText, start: usize, end: usize) -> Option<usize> {
        let lo = end.saturating_sub(SNAP_WINDOW);
        let hi = (end + SNAP_WINDOW).min(doc.len());
        let window = doc.slice(lo, hi);
        let window_base = doc.slice(0, lo).len();

        SENTENCE_END
            .find_iter(window)
            .map(|m| doc.char_pos(window_base + m.start()))
            .filter(|&pos| pos >= start)
            .min_by_key(|&pos| pos.abs_diff(end))
            .filter(|&pos| pos.abs_diff(end) < SNAP_WINDOW)
            .map(|pos| pos + 1)
    }
}
