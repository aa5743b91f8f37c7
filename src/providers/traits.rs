//! Provider trait for interchangeable generation backends.
//!
//! Providers implement a single capability-specific trait rather than a
//! "god trait", enabling the ordered fallback chain in
//! [`chain`](super::chain) to treat remote APIs, local models, and the
//! deterministic template generator uniformly.
//!
//! # Failure semantics
//!
//! Providers signal failure through [`TrendGenError`](crate::TrendGenError);
//! the chain classifies with `is_transient()`:
//! - transient errors are retried on the same provider with backoff, then
//!   the chain advances;
//! - permanent errors (auth, malformed request) advance the chain
//!   immediately without further attempts on that provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::style::ReferenceArticle;
use crate::types::GenerationRequest;

/// Raw provider output: title and body, before the orchestrator attaches
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderArticle {
    /// Article title.
    pub title: String,
    /// Article body text.
    pub body: String,
}

/// A generation backend.
#[async_trait]
pub trait ArticleProvider: Send + Sync {
    /// Provider name for logging, metrics, and result metadata.
    fn name(&self) -> &str;

    /// Generate an article for `request`, optionally conditioned on
    /// `style_examples`.
    async fn generate(
        &self,
        request: &GenerationRequest,
        style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ProviderArticle>;
}
