//! Text embedding for style retrieval.
//!
//! The corpus and every query must be embedded with the same fixed
//! function; [`Embedder`] is the seam where a model-backed implementation
//! would plug in. The default [`HashEmbedder`] is a deterministic
//! feature-hashing bag-of-words embedding: no model download, no network,
//! stable across runs within a process.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default embedding dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 256;

/// A fixed embedding function over text.
pub trait Embedder: Send + Sync {
    /// Dimensionality of produced vectors.
    fn dimensions(&self) -> usize;

    /// Embed a text into a dense vector of [`Embedder::dimensions`] length.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Feature-hashing bag-of-words embedder.
///
/// Tokens are lowercased alphanumeric runs. Each token hashes to a bucket
/// index plus a sign bit (the signed hashing trick, which keeps colliding
/// buckets from accumulating systematic bias).
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create an embedder with the given dimensionality (minimum 1).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();
            let index = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }
        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Euclidean norm of a vector.
pub(crate) fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Cosine similarity between two vectors with precomputed norms.
///
/// Returns 0.0 when either vector is zero (no shared basis to compare).
pub(crate) fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}
