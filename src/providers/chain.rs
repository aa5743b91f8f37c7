//! Ordered provider chain with retry and per-attempt timeouts.
//!
//! The chain walks its providers in priority order. Each provider gets a
//! bounded number of attempts: transient errors sleep with backoff and
//! retry on the same provider; permanent errors skip the remaining
//! attempts and advance to the next provider. Providers run one at a
//! time, never in parallel, so a request costs at most one upstream call
//! when the first provider is healthy.
//!
//! Each attempt runs under a wall-clock timeout. A timeout counts as a
//! transient failure of that attempt.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::style::ReferenceArticle;
use crate::telemetry;
use crate::types::GenerationRequest;
use crate::{Result, TrendGenError};

use super::retry::RetryConfig;
use super::traits::{ArticleProvider, ProviderArticle};

/// Per-provider chain settings.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Wall-clock budget for a single attempt. Default: 30s.
    pub timeout: Duration,
    /// Attempts before advancing past this provider (overrides the
    /// chain-wide retry default when set).
    pub max_attempts: Option<u32>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

impl ProviderSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attempt ceiling for this provider.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n.max(1));
        self
    }
}

struct ChainEntry {
    provider: Arc<dyn ArticleProvider>,
    settings: ProviderSettings,
}

/// Successful chain outcome with provenance.
#[derive(Debug)]
pub struct ChainSuccess {
    /// The generated article.
    pub article: ProviderArticle,
    /// Name of the provider that produced it.
    pub provider: String,
    /// Attempts made across all providers, including the successful one.
    pub total_attempts: u32,
}

/// Priority-ordered fallback chain over [`ArticleProvider`]s.
pub struct ProviderChain {
    entries: Vec<ChainEntry>,
    retry: RetryConfig,
}

impl ProviderChain {
    /// Create an empty chain with the given retry defaults.
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            entries: Vec::new(),
            retry,
        }
    }

    /// Append a provider at the end of the chain (lowest priority so far).
    pub fn push(&mut self, provider: Arc<dyn ArticleProvider>, settings: ProviderSettings) {
        self.entries.push(ChainEntry { provider, settings });
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.provider.name()).collect()
    }

    /// Generate an article, walking providers in priority order.
    ///
    /// Returns the first success. Fails with the last error only when
    /// every provider is exhausted, or with
    /// [`TrendGenError::NoProvider`] when the chain is empty.
    #[instrument(skip(self, request, style_examples), fields(topic = %request.topic))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ChainSuccess> {
        let mut last_err = None;
        let mut total_attempts = 0u32;

        'providers: for entry in &self.entries {
            let name = entry.provider.name();
            let max_attempts = entry.settings.max_attempts.unwrap_or(self.retry.max_attempts);

            for attempt in 0..max_attempts {
                let start = Instant::now();
                total_attempts += 1;
                let result = tokio::time::timeout(
                    entry.settings.timeout,
                    entry.provider.generate(request, style_examples),
                )
                .await
                .unwrap_or(Err(TrendGenError::Timeout(entry.settings.timeout)));

                match result {
                    Ok(article) => {
                        Self::record_request(name, start, true);
                        debug!(provider = name, attempt = attempt + 1, "generation succeeded");
                        return Ok(ChainSuccess {
                            article,
                            provider: name.to_string(),
                            total_attempts,
                        });
                    }
                    Err(e) if e.is_transient() => {
                        Self::record_request(name, start, false);
                        metrics::counter!(telemetry::RETRIES_TOTAL, "provider" => name.to_owned())
                            .increment(1);
                        if attempt + 1 < max_attempts {
                            let delay = self.retry.effective_delay(attempt, e.retry_after());
                            warn!(
                                provider = name,
                                attempt = attempt + 1,
                                max_attempts,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "retrying after transient error"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        last_err = Some(e);
                    }
                    Err(e) => {
                        // Permanent: no further attempts on this provider.
                        Self::record_request(name, start, false);
                        warn!(provider = name, error = %e, "permanent error, advancing chain");
                        last_err = Some(e);
                        continue 'providers;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(TrendGenError::NoProvider))
    }

    fn record_request(provider: &str, start: Instant, success: bool) {
        let status = if success { "success" } else { "error" };
        metrics::counter!(telemetry::PROVIDER_REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::PROVIDER_DURATION_SECONDS,
            "provider" => provider.to_owned(),
        )
        .record(start.elapsed().as_secs_f64());
    }
}
