//! Trendgen - Resilient orchestration core for trend-article generation
//!
//! This crate composes admission control, result caching, style-example
//! retrieval, and a prioritized provider fallback chain into a single
//! [`Orchestrator`], so that a request either completes with an article
//! or is rejected for a deliberate, observable reason.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trendgen::{GenerationRequest, Orchestrator, TemplateProvider};
//!
//! #[tokio::main]
//! async fn main() -> trendgen::Result<()> {
//!     let orchestrator = Orchestrator::builder()
//!         .provider(Arc::new(TemplateProvider::new()))
//!         .build()?;
//!
//!     let request = GenerationRequest::new("AI in Retail", "Technology")
//!         .keywords(["ai", "personalization"]);
//!     let outcome = orchestrator.handle("caller-1", &request).await;
//!
//!     if let Some(article) = outcome.article() {
//!         println!("{}", article.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod orchestrator;
pub mod providers;
pub mod style;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{Result, TrendGenError};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};

pub use cache::{ArticleCache, CacheConfig};
pub use config::{ProviderConfig, TrendGenConfig};
pub use limiter::{Admission, RateLimitConfig, SlidingWindowLimiter};
pub use providers::{
    ArticleProvider, ChainSuccess, LocalModelProvider, ProviderArticle, ProviderChain,
    ProviderSettings, RemoteProvider, RetryConfig, TemplateProvider,
};
pub use style::{Embedder, HashEmbedder, ReferenceArticle, StyleConfig, StyleMatcher};
pub use types::{
    ArticleMetadata, GeneratedArticle, GenerationRequest, RequestOutcome, StyleParameters,
    MAX_KEYWORDS,
};
