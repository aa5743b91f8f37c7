//! Request orchestration: admission, cache, style retrieval, generation.
//!
//! One request flows through four stages in a fixed order: rate-limit
//! admission, cache lookup, style-example retrieval, provider chain. The
//! first three are synchronous and hold no lock across the awaited chain
//! call, so slow providers never serialize unrelated requests.
//!
//! [`Orchestrator::handle`] is infallible by construction: every failure
//! mode maps to a [`RequestOutcome`] variant rather than an error, and a
//! chain ending in [`TemplateProvider`] makes the internal-rejection
//! variant unreachable in practice.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::cache::{ArticleCache, CacheConfig};
use crate::config::{ProviderConfig, TrendGenConfig};
use crate::limiter::{Admission, RateLimitConfig, SlidingWindowLimiter};
use crate::providers::{
    ArticleProvider, LocalModelProvider, ProviderChain, ProviderSettings, RemoteProvider,
    RetryConfig, TemplateProvider,
};
use crate::style::{Embedder, HashEmbedder, ReferenceArticle, StyleConfig, StyleMatcher};
use crate::telemetry;
use crate::types::{ArticleMetadata, GeneratedArticle, GenerationRequest, RequestOutcome};
use crate::{Result, TrendGenError};

/// Composed generation pipeline.
pub struct Orchestrator {
    limiter: SlidingWindowLimiter,
    cache: ArticleCache,
    matcher: StyleMatcher,
    chain: ProviderChain,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Start building an orchestrator.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Build an orchestrator from file configuration plus a reference
    /// corpus.
    ///
    /// Providers are constructed in config order over one shared HTTP
    /// client. An empty provider list is a configuration error.
    pub fn from_config(config: &TrendGenConfig, corpus: Vec<ReferenceArticle>) -> Result<Self> {
        let client = reqwest::Client::new();
        let mut builder = Self::builder()
            .rate_limit(config.rate_limit.to_config())
            .cache(config.cache.to_config())
            .style(config.style.to_config())
            .retry(config.retry.to_config())
            .embedder(Arc::new(HashEmbedder::new(
                config.style.embedding_dimensions,
            )))
            .corpus(corpus);

        for provider in &config.providers {
            builder = match provider {
                ProviderConfig::Remote {
                    name,
                    base_url,
                    api_key,
                    model,
                    timeout_secs,
                    max_attempts,
                } => {
                    let mut remote = RemoteProvider::new(name, base_url, model, client.clone());
                    if let Some(key) = api_key {
                        remote = remote.api_key(key);
                    }
                    let mut settings = ProviderSettings::new()
                        .timeout(std::time::Duration::from_secs(*timeout_secs));
                    if let Some(n) = max_attempts {
                        settings = settings.max_attempts(*n);
                    }
                    builder.provider_with(Arc::new(remote), settings)
                }
                ProviderConfig::Local {
                    name,
                    base_url,
                    model,
                    timeout_secs,
                    max_attempts,
                } => {
                    let local = LocalModelProvider::new(name, base_url, model, client.clone());
                    let mut settings = ProviderSettings::new()
                        .timeout(std::time::Duration::from_secs(*timeout_secs));
                    if let Some(n) = max_attempts {
                        settings = settings.max_attempts(*n);
                    }
                    builder.provider_with(Arc::new(local), settings)
                }
                ProviderConfig::Template => builder.provider(Arc::new(TemplateProvider::new())),
            };
        }

        builder.build()
    }

    /// Handle one request from `identity`.
    ///
    /// Stages run in a fixed order: admission, cache, style retrieval,
    /// provider chain. Never panics and never returns an error; every
    /// failure maps to an outcome variant.
    #[instrument(skip(self, request), fields(topic = %request.topic))]
    pub async fn handle(&self, identity: &str, request: &GenerationRequest) -> RequestOutcome {
        let outcome = self.handle_inner(identity, request).await;
        metrics::counter!(telemetry::OUTCOMES_TOTAL, "outcome" => outcome.tag()).increment(1);
        outcome
    }

    async fn handle_inner(&self, identity: &str, request: &GenerationRequest) -> RequestOutcome {
        if let Admission::Denied { reason } = self.limiter.admit(identity) {
            info!(identity, reason, "request throttled");
            return RequestOutcome::RejectedThrottled {
                reason: reason.to_string(),
            };
        }

        let fingerprint = request.fingerprint();
        if let Some(article) = self.cache.get(fingerprint) {
            return RequestOutcome::CompletedCached(article);
        }

        let examples = self
            .matcher
            .top_k(request, self.matcher.default_example_count());
        metrics::histogram!(telemetry::STYLE_EXAMPLES_SELECTED).record(examples.len() as f64);

        let start = Instant::now();
        match self.chain.generate(request, &examples).await {
            Ok(success) => {
                let body = success.article.body;
                let article = GeneratedArticle {
                    metadata: ArticleMetadata {
                        word_count: body.split_whitespace().count(),
                        provider: success.provider,
                        generation_time_ms: start.elapsed().as_millis() as u64,
                        style_examples_used: examples.len(),
                        generated_at: Utc::now(),
                    },
                    title: success.article.title,
                    body,
                };
                self.cache.put(fingerprint, article.clone());
                RequestOutcome::Completed(article)
            }
            Err(e) => {
                error!(error = %e, "provider chain exhausted");
                RequestOutcome::RejectedInternal {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.provider_names()
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    rate_limit: RateLimitConfig,
    cache: CacheConfig,
    style: StyleConfig,
    retry: RetryConfig,
    corpus: Vec<ReferenceArticle>,
    embedder: Option<Arc<dyn Embedder>>,
    providers: Vec<(Arc<dyn ArticleProvider>, ProviderSettings)>,
}

impl OrchestratorBuilder {
    fn new() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            style: StyleConfig::default(),
            retry: RetryConfig::default(),
            corpus: Vec::new(),
            embedder: None,
            providers: Vec::new(),
        }
    }

    /// Set admission-control limits.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Set result-cache behaviour.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Set style-retrieval behaviour.
    pub fn style(mut self, config: StyleConfig) -> Self {
        self.style = config;
        self
    }

    /// Set retry defaults for the provider chain.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Set the reference corpus for style retrieval.
    pub fn corpus(mut self, corpus: Vec<ReferenceArticle>) -> Self {
        self.corpus = corpus;
        self
    }

    /// Override the embedding function (defaults to [`HashEmbedder`]).
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Append a provider with default settings. Order of calls is
    /// priority order.
    pub fn provider(self, provider: Arc<dyn ArticleProvider>) -> Self {
        self.provider_with(provider, ProviderSettings::default())
    }

    /// Append a provider with explicit settings.
    pub fn provider_with(
        mut self,
        provider: Arc<dyn ArticleProvider>,
        settings: ProviderSettings,
    ) -> Self {
        self.providers.push((provider, settings));
        self
    }

    /// Build the orchestrator.
    ///
    /// Fails with [`TrendGenError::NoProvider`] when no provider was
    /// configured.
    pub fn build(self) -> Result<Orchestrator> {
        if self.providers.is_empty() {
            return Err(TrendGenError::NoProvider);
        }
        let embedder = self
            .embedder
            .unwrap_or_else(|| Arc::new(HashEmbedder::default()));
        let matcher = StyleMatcher::new(self.corpus, embedder, self.style);
        let mut chain = ProviderChain::new(self.retry);
        for (provider, settings) in self.providers {
            chain.push(provider, settings);
        }
        Ok(Orchestrator {
            limiter: SlidingWindowLimiter::new(self.rate_limit),
            cache: ArticleCache::new(self.cache),
            matcher,
            chain,
        })
    }
}
