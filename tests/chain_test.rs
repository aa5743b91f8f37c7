//! Integration tests for provider chain fallback and retry behaviour.
//!
//! Uses mock providers with scripted failure patterns to verify:
//! - transient errors retry on the same provider before advancing
//! - permanent errors advance immediately with no further attempts
//! - the first success wins and later providers are never called

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use trendgen::providers::{
    ArticleProvider, ProviderArticle, ProviderChain, ProviderSettings, RetryConfig,
};
use trendgen::style::ReferenceArticle;
use trendgen::types::GenerationRequest;
use trendgen::{Result, TrendGenError};

/// Mock provider that fails a scripted number of times before succeeding.
struct FlakyProvider {
    name: String,
    calls: AtomicU32,
    failures: u32,
    transient: bool,
}

impl FlakyProvider {
    fn new(name: &str, failures: u32, transient: bool) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicU32::new(0),
            failures,
            transient,
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleProvider for FlakyProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        _style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ProviderArticle> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            if self.transient {
                return Err(TrendGenError::Http("connection reset".into()));
            }
            return Err(TrendGenError::AuthenticationFailed);
        }
        Ok(ProviderArticle {
            title: format!("from {}", self.name),
            body: "generated body".into(),
        })
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig::new()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(1))
        .jitter(false)
}

fn request() -> GenerationRequest {
    GenerationRequest::new("AI in Retail", "Technology").keywords(["ai"])
}

#[tokio::test]
async fn healthy_first_provider_wins_in_one_attempt() {
    let first = Arc::new(FlakyProvider::new("first", 0, true));
    let second = Arc::new(FlakyProvider::new("second", 0, true));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(first.clone(), ProviderSettings::default());
    chain.push(second.clone(), ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(success.provider, "first");
    assert_eq!(success.total_attempts, 1);
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn transient_error_retries_same_provider() {
    let flaky = Arc::new(FlakyProvider::new("flaky", 2, true));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(flaky.clone(), ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(success.provider, "flaky");
    assert_eq!(success.total_attempts, 3);
    assert_eq!(flaky.calls(), 3);
}

#[tokio::test]
async fn exhausted_provider_falls_through_to_next() {
    let broken = Arc::new(FlakyProvider::new("broken", u32::MAX, true));
    let backup = Arc::new(FlakyProvider::new("backup", 0, true));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(broken.clone(), ProviderSettings::default());
    chain.push(backup.clone(), ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(success.provider, "backup");
    // Three transient attempts on the broken provider, then one success.
    assert_eq!(broken.calls(), 3);
    assert_eq!(success.total_attempts, 4);
}

#[tokio::test]
async fn permanent_error_advances_without_retry() {
    let unauthorized = Arc::new(FlakyProvider::new("unauthorized", u32::MAX, false));
    let backup = Arc::new(FlakyProvider::new("backup", 0, true));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(unauthorized.clone(), ProviderSettings::default());
    chain.push(backup.clone(), ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(success.provider, "backup");
    // A permanent error burns exactly one attempt on its provider.
    assert_eq!(unauthorized.calls(), 1);
    assert_eq!(success.total_attempts, 2);
}

#[tokio::test]
async fn per_provider_attempt_ceiling_overrides_default() {
    let broken = Arc::new(FlakyProvider::new("broken", u32::MAX, true));
    let backup = Arc::new(FlakyProvider::new("backup", 0, true));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(broken.clone(), ProviderSettings::new().max_attempts(1));
    chain.push(backup.clone(), ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(broken.calls(), 1);
    assert_eq!(success.provider, "backup");
}

#[tokio::test]
async fn exhausted_chain_returns_last_error() {
    let a = Arc::new(FlakyProvider::new("a", u32::MAX, true));
    let b = Arc::new(FlakyProvider::new("b", u32::MAX, false));
    let mut chain = ProviderChain::new(fast_retry());
    chain.push(a, ProviderSettings::default());
    chain.push(b, ProviderSettings::default());

    let err = chain.generate(&request(), &[]).await.unwrap_err();
    assert!(matches!(err, TrendGenError::AuthenticationFailed));
}

#[tokio::test]
async fn empty_chain_reports_no_provider() {
    let chain = ProviderChain::new(fast_retry());
    let err = chain.generate(&request(), &[]).await.unwrap_err();
    assert!(matches!(err, TrendGenError::NoProvider));
}

#[tokio::test]
async fn slow_provider_times_out_and_falls_through() {
    struct HangingProvider;

    #[async_trait]
    impl ArticleProvider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
            _style_examples: &[Arc<ReferenceArticle>],
        ) -> Result<ProviderArticle> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    let backup = Arc::new(FlakyProvider::new("backup", 0, true));
    let mut chain = ProviderChain::new(fast_retry().max_attempts(1));
    chain.push(
        Arc::new(HangingProvider),
        ProviderSettings::new().timeout(Duration::from_millis(10)),
    );
    chain.push(backup, ProviderSettings::default());

    let success = chain.generate(&request(), &[]).await.unwrap();
    assert_eq!(success.provider, "backup");
}
