//! Paragraph packing with overlap carry-over.

use super::{assemble, CharText, ChunkParams, Piece, TokenCounter};
use crate::core::types::{DocumentChunk, FileMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const SEPARATOR: &str = "\n\n";

static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("static paragraph regex"));

/// Packs blank-line separated paragraphs into chunks of at most
/// `chunk_size` chars (a single oversized paragraph stays whole).
/// Each new chunk starts with the last `chunk_overlap` chars of the
/// previous one.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    tokens: TokenCounter,
}

struct Running {
    text: String,
    len: usize,
    start: usize,
    end: usize,
}

impl ParagraphChunker {
    pub fn new(params: ChunkParams) -> Self {
        Self {
            chunk_size: params.chunk_size,
            chunk_overlap: params.chunk_overlap,
            tokens: params.tokens,
        }
    }

    pub fn chunk(&self, text: &str, source: Option<Arc<FileMetadata>>) -> Vec<DocumentChunk> {
        let doc = CharText::new(text);
        let mut pieces = Vec::new();
        let mut current: Option<Running> = None;

        for (start, end) in paragraphs(&doc) {
            let para = doc.slice(start, end);
            let para_len = end - start;

            current = Some(match current.take() {
                Some(cur) if cur.len + para_len > self.chunk_size => {
                    let next = self.carry_over(&cur, para, start, end);
                    pieces.push(Piece {
                        text: cur.text,
                        start: cur.start,
                        end: cur.end,
                    });
                    next
                }
                Some(mut cur) => {
                    cur.text.push_str(SEPARATOR);
                    cur.text.push_str(para);
                    cur.len += SEPARATOR.len() + para_len;
                    cur.end = end;
                    cur
                }
                None => Running {
                    text: para.to_string(),
                    len: para_len,
                    start,
                    end,
                },
            });
        }

        if let Some(cur) = current {
            pieces.push(Piece {
                text: cur.text,
                start: cur.start,
                end: cur.end,
            });
        }

        assemble(pieces, "paragraph", None, &self.tokens, source)
    }

    /// Seed the next chunk with the tail of the closed one
    fn carry_over(&self, closed: &Running, para: &str, start: usize, end: usize) -> Running {
        if self.chunk_overlap == 0 {
            return Running {
                text: para.to_string(),
                len: end - start,
                start,
                end,
            };
        }

        let tail_len = closed.len.min(self.chunk_overlap);
        let tail: String = closed.text.chars().skip(closed.len - tail_len).collect();
        // The closed chunk was joined with normalized separators, so the
        // tail's source offset is approximate when it spans paragraphs.
        let tail_start = closed.end.saturating_sub(tail_len).max(closed.start);

        Running {
            text: format!("{tail}{SEPARATOR}{para}"),
            len: tail_len + SEPARATOR.len() + (end - start),
            start: tail_start,
            end,
        }
    }
}

/// Trimmed, non-empty paragraph spans in char positions
fn paragraphs(doc: &CharText) -> Vec<(usize, usize)> {
    let text = doc.as_str();
    let mut spans = Vec::new();
    let mut cursor = 0;

    let bounds = BLANK_LINE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((text.len(), text.len())));

    for (sep_start, sep_end) in bounds {
        let (s, e) = doc.trim_span(doc.char_pos(cursor), doc.char_pos(sep_start));
        if e > s {
            spans.push((s, e));
        }
        cursor = sep_end;
    }

    spans
}
