//! Telemetry metric name constants.
//!
//! Centralised metric names for trendgen operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `trendgen_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "remote-primary", "template")
//! - `status` — outcome: "success" or "error"
//! - `window` — rate-limit window: "minute" or "hour"
//! - `outcome` — orchestration outcome tag (e.g. "completed-cached")

/// Total provider generation attempts dispatched through the chain.
///
/// Labels: `provider`, `status` ("success" | "error").
pub const PROVIDER_REQUESTS_TOTAL: &str = "trendgen_provider_requests_total";

/// Provider attempt duration in seconds.
///
/// Labels: `provider`.
pub const PROVIDER_DURATION_SECONDS: &str = "trendgen_provider_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "trendgen_retries_total";

/// Total result-cache hits.
pub const CACHE_HITS_TOTAL: &str = "trendgen_cache_hits_total";

/// Total result-cache misses (absent or expired entries).
pub const CACHE_MISSES_TOTAL: &str = "trendgen_cache_misses_total";

/// Total admissions denied by the rate limiter.
///
/// Labels: `window` ("minute" | "hour").
pub const RATE_LIMIT_REJECTIONS_TOTAL: &str = "trendgen_rate_limit_rejections_total";

/// Number of style examples selected per generation.
pub const STYLE_EXAMPLES_SELECTED: &str = "trendgen_style_examples_selected";

/// Total orchestrated requests by terminal outcome.
///
/// Labels: `outcome` ("completed" | "completed-cached" |
/// "rejected-throttled" | "rejected-internal").
pub const OUTCOMES_TOTAL: &str = "trendgen_outcomes_total";
