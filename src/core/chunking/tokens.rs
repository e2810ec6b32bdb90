//! Token counting for chunk metadata.
//!
//! Chunk sizes are always measured in characters. Token counts are
//! informational: BPE counts when the `cl100k_base` encoder loads,
//! character counts otherwise. Counts from the two modes are not
//! comparable.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

use crate::core::error::RagError;

static CL100K: Lazy<Option<Arc<CoreBPE>>> = Lazy::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(Arc::new(bpe)),
    Err(e) => {
        tracing::warn!(
            "cl100k_base tokenizer unavailable, token counts fall back to characters: {}",
            e
        );
        None
    }
});

/// Configured tokenizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    #[default]
    Cl100kBase,
    Characters,
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerKind::Cl100kBase => write!(f, "cl100k_base"),
            TokenizerKind::Characters => write!(f, "characters"),
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" | "cl100k" => Ok(TokenizerKind::Cl100kBase),
            "characters" | "chars" => Ok(TokenizerKind::Characters),
            other => Err(RagError::validation(format!(
                "Unknown tokenizer '{other}'. Available: cl100k_base, characters"
            ))),
        }
    }
}

/// Counts tokens in chunk text
#[derive(Clone, Default)]
pub enum TokenCounter {
    Bpe(Arc<CoreBPE>),
    #[default]
    Characters,
}

impl TokenCounter {
    /// Counter for the configured kind, degrading to characters if BPE is unavailable
    pub fn for_kind(kind: TokenizerKind) -> Self {
        match kind {
            TokenizerKind::Cl100kBase => match CL100K.as_ref() {
                Some(bpe) => TokenCounter::Bpe(Arc::clone(bpe)),
                None => TokenCounter::Characters,
            },
            TokenizerKind::Characters => TokenCounter::Characters,
        }
    }

    pub fn count(&self, text: &str) -> usize {
        match self {
            TokenCounter::Bpe(bpe) => bpe.encode_ordinary(text).len(),
            TokenCounter::Characters => text.chars().count(),
        }
    }

    pub fn is_bpe(&self) -> bool {
        matches!(self, TokenCounter::Bpe(_))
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenCounter::Bpe(_) => write!(f, "TokenCounter::Bpe(cl100k_base)"),
            TokenCounter::Characters => write!(f, "TokenCounter::Characters"),
        }
    }
}
