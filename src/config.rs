//! TOML-backed configuration.
//!
//! The file-facing structs here use plain integers and `_secs`/`_ms`
//! suffixed fields; conversion methods produce the runtime config types
//! the subsystems consume. Every field has a default, so an empty file
//! yields a working template-only setup.
//!
//! ```toml
//! [rate_limit]
//! requests_per_minute = 10
//! requests_per_hour = 100
//!
//! [cache]
//! capacity = 128
//! ttl_secs = 86400
//!
//! [style]
//! similarity_threshold = 0.1
//! default_example_count = 3
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 500
//!
//! [[providers]]
//! kind = "remote"
//! name = "primary"
//! base_url = "https://api.example.com"
//! api_key = "sk-..."
//! model = "trend-writer-large"
//!
//! [[providers]]
//! kind = "template"
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::limiter::RateLimitConfig;
use crate::providers::RetryConfig;
use crate::style::StyleConfig;
use crate::{Result, TrendGenError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendGenConfig {
    /// Admission control settings.
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    /// Result cache settings.
    #[serde(default)]
    pub cache: CacheSection,
    /// Style matcher settings.
    #[serde(default)]
    pub style: StyleSection,
    /// Retry settings shared by the provider chain.
    #[serde(default)]
    pub retry: RetrySection,
    /// Providers in priority order. Empty means template-only.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl TrendGenConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TrendGenError::Configuration(e.to_string()))
    }
}

/// `[rate_limit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSection {
    /// Admissions per identity per minute.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: usize,
    /// Admissions per identity per hour.
    #[serde(default = "default_requests_per_hour")]
    pub requests_per_hour: usize,
}

fn default_requests_per_minute() -> usize {
    10
}

fn default_requests_per_hour() -> usize {
    100
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            requests_per_hour: default_requests_per_hour(),
        }
    }
}

impl RateLimitSection {
    /// Convert to the runtime limiter config.
    pub fn to_config(&self) -> RateLimitConfig {
        RateLimitConfig::new()
            .requests_per_minute(self.requests_per_minute)
            .requests_per_hour(self.requests_per_hour)
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Maximum cached articles. 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Entry time-to-live in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_capacity() -> usize {
    128
}

fn default_cache_ttl_secs() -> u64 {
    24 * 3600
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl CacheSection {
    /// Convert to the runtime cache config.
    pub fn to_config(&self) -> CacheConfig {
        CacheConfig::new()
            .capacity(self.capacity)
            .ttl(Duration::from_secs(self.ttl_secs))
    }
}

/// `[style]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleSection {
    /// Minimum cosine similarity for a style example.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Style examples retrieved per generation.
    #[serde(default = "default_example_count")]
    pub default_example_count: usize,
    /// Dimensionality of the embedding space.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

fn default_similarity_threshold() -> f32 {
    0.1
}

fn default_example_count() -> usize {
    3
}

fn default_embedding_dimensions() -> usize {
    crate::style::DEFAULT_DIMENSIONS
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            default_example_count: default_example_count(),
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}

impl StyleSection {
    /// Convert to the runtime style config.
    pub fn to_config(&self) -> StyleConfig {
        StyleConfig::new()
            .similarity_threshold(self.similarity_threshold)
            .default_example_count(self.default_example_count)
    }
}

/// `[retry]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    /// Attempts per provider, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Backoff ceiling in seconds.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Whether delays carry random jitter.
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_secs() -> u64 {
    30
}

fn default_jitter() -> bool {
    true
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
            jitter: default_jitter(),
        }
    }
}

impl RetrySection {
    /// Convert to the runtime retry config.
    pub fn to_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.max_attempts)
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .jitter(self.jitter)
    }
}

/// One `[[providers]]` entry, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// OpenAI-compatible remote endpoint.
    Remote {
        /// Provider name for metrics and metadata.
        name: String,
        /// Endpoint base URL.
        base_url: String,
        /// Bearer token, if the endpoint requires one.
        #[serde(default)]
        api_key: Option<String>,
        /// Model identifier.
        model: String,
        /// Per-attempt timeout in seconds.
        #[serde(default = "default_provider_timeout_secs")]
        timeout_secs: u64,
        /// Attempt ceiling overriding the `[retry]` default.
        #[serde(default)]
        max_attempts: Option<u32>,
    },
    /// Local inference server (Ollama generate API).
    Local {
        /// Provider name for metrics and metadata.
        name: String,
        /// Server base URL.
        base_url: String,
        /// Model identifier.
        model: String,
        /// Per-attempt timeout in seconds.
        #[serde(default = "default_provider_timeout_secs")]
        timeout_secs: u64,
        /// Attempt ceiling overriding the `[retry]` default.
        #[serde(default)]
        max_attempts: Option<u32>,
    },
    /// Deterministic template generator.
    Template,
}

fn default_provider_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = TrendGenConfig::from_toml_str("").unwrap();
        assert_eq!(config.rate_limit.requests_per_minute, 10);
        assert_eq!(config.cache.capacity, 128);
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn provider_list_parses_in_order() {
        let config = TrendGenConfig::from_toml_str(
            r#"
            [[providers]]
            kind = "remote"
            name = "primary"
            base_url = "https://api.example.com"
            model = "writer-large"

            [[providers]]
            kind = "local"
            name = "local"
            base_url = "http://localhost:11434"
            model = "llama3"

            [[providers]]
            kind = "template"
            "#,
        )
        .unwrap();
        assert_eq!(config.providers.len(), 3);
        assert!(matches!(
            config.providers[0],
            ProviderConfig::Remote { ref name, .. } if name == "primary"
        ));
        assert!(matches!(config.providers[2], ProviderConfig::Template));
    }

    #[test]
    fn sections_convert_to_runtime_configs() {
        let config = TrendGenConfig::from_toml_str(
            r#"
            [rate_limit]
            requests_per_minute = 5

            [cache]
            ttl_secs = 60

            [retry]
            initial_delay_ms = 250
            jitter = false
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.to_config().requests_per_minute, 5);
        assert_eq!(config.cache.to_config().ttl, Duration::from_secs(60));
        let retry = config.retry.to_config();
        assert_eq!(retry.initial_delay, Duration::from_millis(250));
        assert!(!retry.jitter);
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = TrendGenConfig::from_toml_str("rate_limit = 3").unwrap_err();
        assert!(matches!(err, TrendGenError::Configuration(_)));
    }
}
