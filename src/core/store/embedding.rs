//! Text embeddings and the process-wide model registry.
//!
//! Models are loaded through [`ModelRegistry::acquire`] and shared by
//! handle, so each model is constructed once per registry no matter how
//! many pipelines or collections use it.
//!
//! Two families are available:
//! - `hashing-<dims>`: offline feature hashing, always built
//! - sentence-transformer models such as `all-MiniLM-L6-v2`, run locally
//!   through fastembed when the `local-embeddings` feature is enabled

use crate::core::error::{RagError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Model used when the configuration names none
#[cfg(feature = "local-embeddings")]
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
#[cfg(not(feature = "local-embeddings"))]
pub const DEFAULT_MODEL: &str = "hashing-384";

const HASHING_PREFIX: &str = "hashing-";
const MIN_DIMENSIONS: usize = 16;
const MAX_DIMENSIONS: usize = 4096;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Turns texts into fixed-size vectors
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Offline feature-hashing embedder.
///
/// Identifier-aware word tokens and character trigrams are hashed into
/// signed buckets, then the vector is L2-normalized. Deterministic across
/// processes and platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    name: String,
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        let name = format!("{HASHING_PREFIX}{dimensions}");
        if !(MIN_DIMENSIONS..=MAX_DIMENSIONS).contains(&dimensions) {
            return Err(RagError::embedding(
                format!("Dimensions must be between {MIN_DIMENSIONS} and {MAX_DIMENSIONS}"),
                name,
            ));
        }
        Ok(Self { name, dimensions })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for word in word_tokens(text) {
            self.add_feature(&mut vector, word.as_bytes(), 1.0);
        }

        let chars: Vec<char> = text.to_lowercase().chars().collect();
        for window in chars.windows(3) {
            if window.iter().all(|c| c.is_whitespace()) {
                continue;
            }
            let trigram: String = window.iter().collect();
            self.add_feature(&mut vector, trigram.as_bytes(), TRIGRAM_WEIGHT);
        }

        normalize(&mut vector);
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Canonical name and output dimensions of a supported local model.
///
/// Accepts the bare model name or its Hugging Face path, case-insensitively.
pub fn local_model(model_name: &str) -> Option<(&'static str, usize)> {
    let bare = model_name.rsplit('/').next().unwrap_or(model_name);
    match bare.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" => Some(("all-MiniLM-L6-v2", 384)),
        "all-minilm-l12-v2" => Some(("all-MiniLM-L12-v2", 384)),
        "bge-small-en-v1.5" => Some(("bge-small-en-v1.5", 384)),
        "bge-base-en-v1.5" => Some(("bge-base-en-v1.5", 768)),
        "nomic-embed-text-v1.5" => Some(("nomic-embed-text-v1.5", 768)),
        _ => None,
    }
}

#[cfg(feature = "local-embeddings")]
mod local {
    use super::Embedder;
    use crate::core::error::{RagError, Result};
    use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
    use std::sync::Mutex;

    const EMBED_BATCH: usize = 64;

    /// Sentence-transformer model run on the CPU through ONNX Runtime.
    ///
    /// Weights are fetched into the fastembed cache on first load.
    pub struct FastEmbedder {
        name: &'static str,
        dimensions: usize,
        model: Mutex<TextEmbedding>,
    }

    impl FastEmbedder {
        pub fn load(name: &'static str, dimensions: usize) -> Result<Self> {
            let model = match name {
                "all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLML6V2,
                "all-MiniLM-L12-v2" => EmbeddingModel::AllMiniLML12V2,
                "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
                "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
                "nomic-embed-text-v1.5" => EmbeddingModel::NomicEmbedTextV15,
                other => {
                    return Err(RagError::embedding("No fastembed model for this name", other))
                }
            };
            let options = TextInitOptions::new(model).with_show_download_progress(false);
            let model = TextEmbedding::try_new(options)
                .map_err(|e| RagError::embedding(format!("Failed to load model: {e}"), name))?;

            Ok(Self {
                name,
                dimensions,
                model: Mutex::new(model),
            })
        }
    }

    impl Embedder for FastEmbedder {
        fn model_name(&self) -> &str {
            self.name
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let mut model = self
                .model
                .lock()
                .map_err(|_| RagError::embedding("Model lock poisoned", self.name))?;
            model
                .embed(texts.to_vec(), Some(EMBED_BATCH))
                .map_err(|e| RagError::embedding(format!("Embedding failed: {e}"), self.name))
        }
    }
}

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedder;

/// Lowercased alphanumeric runs, plus their camelCase / snake_case parts
fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for raw in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
        if raw.is_empty() {
            continue;
        }
        let parts = split_identifier(raw);
        if parts.len() > 1 {
            tokens.extend(parts);
        }
        tokens.push(raw.to_lowercase());
    }

    tokens
}

fn split_identifier(ident: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in ident.chars() {
        if ch == '_' {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_numeric();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine distance `1 - cos(a, b)`; zero vectors are at distance 1
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let nb = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

/// Loaded embedding models keyed by name
#[derive(Default)]
pub struct ModelRegistry {
    models: Mutex<HashMap<String, Arc<dyn Embedder>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a model once; later calls return the cached instance
    pub fn acquire(&self, model_name: &str) -> Result<Arc<dyn Embedder>> {
        let mut models = self
            .models
            .lock()
            .map_err(|_| RagError::embedding("Model registry lock poisoned", model_name))?;

        if let Some(model) = models.get(model_name) {
            debug!("Using cached embedding model: {}", model_name);
            return Ok(Arc::clone(model));
        }

        info!("Loading embedding model: {}", model_name);
        let model = load_model(model_name)?;
        models.insert(model_name.to_string(), Arc::clone(&model));
        info!("Embedding model cached: {}", model_name);
        Ok(model)
    }

    /// Drop every cached model
    pub fn release_all(&self) {
        if let Ok(mut models) = self.models.lock() {
            info!("Releasing {} cached embedding models", models.len());
            models.clear();
        }
    }

    pub fn loaded_models(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .models
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.loaded_models())
            .finish()
    }
}

fn load_model(model_name: &str) -> Result<Arc<dyn Embedder>> {
    if let Some(dims) = model_name.strip_prefix(HASHING_PREFIX) {
        let dimensions = dims.parse::<usize>().map_err(|_| {
            RagError::embedding(
                format!("Expected {HASHING_PREFIX}<dims> with numeric dims"),
                model_name,
            )
        })?;
        return Ok(Arc::new(HashingEmbedder::new(dimensions)?));
    }

    match local_model(model_name) {
        Some((name, dimensions)) => load_local(name, dimensions),
        None => Err(RagError::embedding(
            format!(
                "Unknown embedding model. Available: {HASHING_PREFIX}<dims>, all-MiniLM-L6-v2, \
                 all-MiniLM-L12-v2, bge-small-en-v1.5, bge-base-en-v1.5, nomic-embed-text-v1.5"
            ),
            model_name,
        )),
    }
}

#[cfg(feature = "local-embeddings")]
fn load_local(name: &'static str, dimensions: usize) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(FastEmbedder::load(name, dimensions)?))
}

#[cfg(not(feature = "local-embeddings"))]
fn load_local(name: &'static str, _dimensions: usize) -> Result<Arc<dyn Embedder>> {
    Err(RagError::embedding(
        "Local models need ragdex built with the `local-embeddings` feature",
        name,
    ))
}
