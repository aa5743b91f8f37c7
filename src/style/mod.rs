//! Style-example retrieval over an immutable reference corpus.
//!
//! The corpus is embedded once at construction; vectors and norms are
//! cached for the lifetime of the matcher. Queries rank the corpus by
//! cosine similarity, filter by a minimum-similarity threshold, and break
//! ties by corpus insertion order (stable sort). The corpus is read-only
//! after load, so the query path takes no locks; only the query-embedding
//! memo (deterministic input → deterministic vector) is shared state, and
//! it lives in a concurrent cache.

pub mod embedding;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::GenerationRequest;
use embedding::{cosine, norm};

pub use embedding::{DEFAULT_DIMENSIONS, Embedder, HashEmbedder};

/// Number of memoized query embeddings.
const QUERY_CACHE_CAPACITY: u64 = 1_024;

/// A reference article from the prior-content corpus.
///
/// Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceArticle {
    /// Corpus-unique identifier.
    pub id: String,
    /// Business category.
    pub category: String,
    /// Article title.
    pub title: String,
    /// Article body text.
    pub body: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ReferenceArticle {
    /// Text embedded for similarity search.
    fn embedding_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.category);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text.push(' ');
        text.push_str(&self.body);
        text
    }
}

/// Style matcher configuration.
#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// Minimum cosine similarity for an example to qualify. Articles below
    /// the threshold are excluded even if fewer than `k` remain.
    /// Default: 0.1.
    pub similarity_threshold: f32,
    /// Number of examples requested per generation. Default: 3.
    pub default_example_count: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            default_example_count: 3,
        }
    }
}

impl StyleConfig {
    /// Create a config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the default number of examples per generation.
    pub fn default_example_count(mut self, count: usize) -> Self {
        self.default_example_count = count;
        self
    }
}

struct IndexedArticle {
    article: Arc<ReferenceArticle>,
    vector: Vec<f32>,
    norm: f32,
}

/// Nearest-neighbour search over the embedded reference corpus.
pub struct StyleMatcher {
    embedder: Arc<dyn Embedder>,
    config: StyleConfig,
    index: Vec<IndexedArticle>,
    query_cache: moka::sync::Cache<u64, Arc<Vec<f32>>>,
}

impl StyleMatcher {
    /// Build a matcher, embedding every corpus article up front.
    ///
    /// Corpus order is preserved and becomes the tie-break order for
    /// equal-similarity results.
    pub fn new(
        corpus: Vec<ReferenceArticle>,
        embedder: Arc<dyn Embedder>,
        config: StyleConfig,
    ) -> Self {
        let index = corpus
            .into_iter()
            .map(|article| {
                let vector = embedder.embed(&article.embedding_text());
                let norm = norm(&vector);
                IndexedArticle {
                    article: Arc::new(article),
                    vector,
                    norm,
                }
            })
            .collect();
        Self {
            embedder,
            config,
            index,
            query_cache: moka::sync::Cache::new(QUERY_CACHE_CAPACITY),
        }
    }

    /// Build a matcher from a JSON array of [`ReferenceArticle`].
    pub fn from_json(
        json: &str,
        embedder: Arc<dyn Embedder>,
        config: StyleConfig,
    ) -> Result<Self> {
        let corpus: Vec<ReferenceArticle> = serde_json::from_str(json)?;
        Ok(Self::new(corpus, embedder, config))
    }

    /// Top-`k` reference articles most similar to the request.
    ///
    /// Results are sorted by descending cosine similarity; ties keep
    /// corpus insertion order. May return fewer than `k` entries — or
    /// none — when the threshold filters the rest out.
    pub fn top_k(&self, request: &GenerationRequest, k: usize) -> Vec<Arc<ReferenceArticle>> {
        if k == 0 || self.index.is_empty() {
            return Vec::new();
        }
        let query = request.style_query();
        let query_vector = self.query_vector(&query);
        let query_norm = norm(&query_vector);
        if query_norm == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &IndexedArticle)> = self
            .index
            .iter()
            .map(|entry| {
                let similarity = cosine(&query_vector, query_norm, &entry.vector, entry.norm);
                (similarity, entry)
            })
            .filter(|(similarity, _)| *similarity >= self.config.similarity_threshold)
            .collect();

        // Stable sort: equal scores keep corpus insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(_, entry)| Arc::clone(&entry.article))
            .collect()
    }

    /// Configured default number of examples per generation.
    pub fn default_example_count(&self) -> usize {
        self.config.default_example_count
    }

    /// Number of articles in the corpus.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn query_vector(&self, query: &str) -> Arc<Vec<f32>> {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        let key = hasher.finish();
        self.query_cache
            .get_with(key, || Arc::new(self.embedder.embed(query)))
    }
}
