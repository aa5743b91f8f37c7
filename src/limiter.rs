//! Sliding-window admission control per caller identity.
//!
//! Each identity carries two monotonically-ordered timestamp windows
//! (60 seconds and 3600 seconds). An admission purges stale timestamps,
//! checks both ceilings, and appends the current instant to both windows —
//! all under one lock acquisition, so two concurrent calls can never both
//! be admitted when only one slot remains.
//!
//! A denied call consumes no slot in either window. Identities are
//! independent; there is no global cap.
//!
//! Identity state is reclaimed two ways: an identity whose windows drain
//! on its own call is dropped immediately, and a periodic sweep removes
//! identities that went idle and never called back.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::telemetry;

/// Horizon of the per-minute window.
const MINUTE_HORIZON: Duration = Duration::from_secs(60);

/// Horizon of the per-hour window.
const HOUR_HORIZON: Duration = Duration::from_secs(3600);

/// How often the identity map is swept for drained windows. Anything
/// older than the hour horizon is reclaimable, so sweeping at that
/// cadence bounds the map to identities active within the last two hours.
const SWEEP_INTERVAL: Duration = HOUR_HORIZON;

/// Rate limiter configuration.
///
/// ```rust
/// # use trendgen::limiter::RateLimitConfig;
/// let config = RateLimitConfig::new()
///     .requests_per_minute(10)
///     .requests_per_hour(100);
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum admissions per identity in any 60-second window. Default: 10.
    pub requests_per_minute: usize,
    /// Maximum admissions per identity in any 3600-second window. Default: 100.
    pub requests_per_hour: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 10,
            requests_per_hour: 100,
        }
    }
}

impl RateLimitConfig {
    /// Create a config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-minute ceiling.
    pub fn requests_per_minute(mut self, n: usize) -> Self {
        self.requests_per_minute = n;
        self
    }

    /// Set the per-hour ceiling.
    pub fn requests_per_hour(mut self, n: usize) -> Self {
        self.requests_per_hour = n;
        self
    }
}

/// Admission decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Request admitted; a slot was consumed in both windows.
    Allowed,
    /// Request denied; no slot consumed.
    Denied {
        /// Which ceiling was hit.
        reason: &'static str,
    },
}

#[derive(Debug, Default)]
struct IdentityWindows {
    minute: VecDeque<Instant>,
    hour: VecDeque<Instant>,
}

impl IdentityWindows {
    fn is_empty(&self) -> bool {
        self.minute.is_empty() && self.hour.is_empty()
    }

    fn purge(&mut self, now: Instant) {
        while let Some(front) = self.minute.front() {
            if now.duration_since(*front) >= MINUTE_HORIZON {
                self.minute.pop_front();
            } else {
                break;
            }
        }
        while let Some(front) = self.hour.front() {
            if now.duration_since(*front) >= HOUR_HORIZON {
                self.hour.pop_front();
            } else {
                break;
            }
        }
    }
}

#[derive(Debug)]
struct LimiterState {
    windows: HashMap<String, IdentityWindows>,
    last_sweep: Instant,
}

/// Two-window sliding-window rate limiter keyed on opaque caller identity.
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

impl SlidingWindowLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Decide admission for one request from `identity`.
    pub fn admit(&self, identity: &str) -> Admission {
        self.admit_at(identity, Instant::now())
    }

    fn admit_at(&self, identity: &str, now: Instant) -> Admission {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if now.duration_since(state.last_sweep) >= SWEEP_INTERVAL {
            state.windows.retain(|_, windows| {
                windows.purge(now);
                !windows.is_empty()
            });
            state.last_sweep = now;
        }

        let entry = state.windows.entry(identity.to_string()).or_default();
        entry.purge(now);

        let decision = if entry.minute.len() >= self.config.requests_per_minute {
            metrics::counter!(telemetry::RATE_LIMIT_REJECTIONS_TOTAL, "window" => "minute")
                .increment(1);
            debug!(identity, "admission denied by minute window");
            Admission::Denied {
                reason: "per-minute limit exceeded",
            }
        } else if entry.hour.len() >= self.config.requests_per_hour {
            metrics::counter!(telemetry::RATE_LIMIT_REJECTIONS_TOTAL, "window" => "hour")
                .increment(1);
            debug!(identity, "admission denied by hour window");
            Admission::Denied {
                reason: "per-hour limit exceeded",
            }
        } else {
            entry.minute.push_back(now);
            entry.hour.push_back(now);
            Admission::Allowed
        };

        // Drained windows leave no entry behind.
        if entry.is_empty() {
            state.windows.remove(identity);
        }
        decision
    }

    /// Number of identities currently holding window state.
    pub fn tracked_identities(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied(reason: &'static str) -> Admission {
        Admission::Denied { reason }
    }

    #[test]
    fn first_call_from_unseen_identity_is_allowed() {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig::default());
        assert_eq!(limiter.admit("10.0.0.1"), Admission::Allowed);
    }

    #[test]
    fn third_call_within_minute_is_denied_at_limit_two() {
        let limiter =
            SlidingWindowLimiter::new(RateLimitConfig::new().requests_per_minute(2));
        let now = Instant::now();
        assert_eq!(limiter.admit_at("c", now), Admission::Allowed);
        assert_eq!(limiter.admit_at("c", now + Duration::from_secs(1)), Admission::Allowed);
        assert_eq!(
            limiter.admit_at("c", now + Duration::from_secs(2)),
            denied("per-minute limit exceeded")
        );
    }

    #[test]
    fn minute_window_slides_open_again() {
        let limiter =
            SlidingWindowLimiter::new(RateLimitConfig::new().requests_per_minute(2));
        let now = Instant::now();
        assert_eq!(limiter.admit_at("c", now), Admission::Allowed);
        assert_eq!(limiter.admit_at("c", now), Admission::Allowed);
        assert!(matches!(
            limiter.admit_at("c", now),
            Admission::Denied { .. }
        ));
        // 61 seconds later the minute window has drained.
        assert_eq!(
            limiter.admit_at("c", now + Duration::from_secs(61)),
            Admission::Allowed
        );
    }

    #[test]
    fn hour_window_caps_across_slid_minute_windows() {
        let limiter = SlidingWindowLimiter::new(
            RateLimitConfig::new()
                .requests_per_minute(10)
                .requests_per_hour(3),
        );
        let now = Instant::now();
        for i in 0..3 {
            assert_eq!(
                limiter.admit_at("c", now + Duration::from_secs(i * 120)),
                Admission::Allowed
            );
        }
        assert_eq!(
            limiter.admit_at("c", now + Duration::from_secs(600)),
            denied("per-hour limit exceeded")
        );
        // Past the hour horizon of the first admission, one slot reopens.
        assert_eq!(
            limiter.admit_at("c", now + Duration::from_secs(3601)),
            Admission::Allowed
        );
    }

    #[test]
    fn denied_call_consumes_no_slot() {
        let limiter =
            SlidingWindowLimiter::new(RateLimitConfig::new().requests_per_minute(1));
        let now = Instant::now();
        assert_eq!(limiter.admit_at("c", now), Admission::Allowed);
        for _ in 0..5 {
            assert!(matches!(
                limiter.admit_at("c", now + Duration::from_secs(1)),
                Admission::Denied { .. }
            ));
        }
        // Only the single admitted timestamp ages out; denials left no trace.
        assert_eq!(
            limiter.admit_at("c", now + Duration::from_secs(61)),
            Admission::Allowed
        );
    }

    #[test]
    fn idle_identity_state_is_swept() {
        let limiter = SlidingWindowLimiter::new(RateLimitConfig::default());
        let now = Instant::now();
        assert_eq!(limiter.admit_at("idle", now), Admission::Allowed);
        assert_eq!(limiter.tracked_identities(), 1);
        // A later call from anyone triggers the sweep; the idle identity's
        // windows have drained past the hour horizon and its entry is gone.
        assert_eq!(
            limiter.admit_at("active", now + Duration::from_secs(3601)),
            Admission::Allowed
        );
        assert_eq!(limiter.tracked_identities(), 1);
        assert!(matches!(
            limiter.admit_at("active", now + Duration::from_secs(3602)),
            Admission::Allowed
        ));
    }

    #[test]
    fn denied_only_identity_leaves_no_state() {
        // A zero ceiling denies every call; denials must not accumulate
        // per-identity state.
        let limiter =
            SlidingWindowLimiter::new(RateLimitConfig::new().requests_per_minute(0));
        for i in 0..5 {
            assert!(matches!(
                limiter.admit(&format!("caller-{i}")),
                Admission::Denied { .. }
            ));
        }
        assert_eq!(limiter.tracked_identities(), 0);
    }

    #[test]
    fn identities_are_independent() {
        let limiter =
            SlidingWindowLimiter::new(RateLimitConfig::new().requests_per_minute(1));
        let now = Instant::now();
        assert_eq!(limiter.admit_at("a", now), Admission::Allowed);
        assert!(matches!(
            limiter.admit_at("a", now),
            Admission::Denied { .. }
        ));
        assert_eq!(limiter.admit_at("b", now), Admission::Allowed);
    }
}
