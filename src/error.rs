//! Trendgen error types

use std::time::Duration;

/// Trendgen error types
#[derive(Debug, thiserror::Error)]
pub enum TrendGenError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by provider, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response from provider")]
    EmptyResponse,

    // Admission errors
    #[error("request throttled: {0}")]
    Throttled(String),

    // Configuration errors
    #[error("no provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TrendGenError {
    /// Whether this error is transient and worth retrying on the same provider.
    ///
    /// Network failures, timeouts, 5xx responses, provider rate/quota signals,
    /// and empty responses are transient. Authentication and malformed-request
    /// failures are permanent: the chain advances to the next provider
    /// without retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } | Self::Timeout(_) | Self::EmptyResponse => {
                true
            }
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Provider-suggested retry delay, if any.
    ///
    /// Only `RateLimited` carries a hint (from a `Retry-After` header).
    /// Takes precedence over computed backoff.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for trendgen operations
pub type Result<T> = std::result::Result<T, TrendGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        assert!(
            TrendGenError::Api {
                status: 503,
                message: "unavailable".into()
            }
            .is_transient()
        );
        assert!(TrendGenError::Http("connection reset".into()).is_transient());
        assert!(TrendGenError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(TrendGenError::RateLimited { retry_after: None }.is_transient());
        assert!(TrendGenError::EmptyResponse.is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!TrendGenError::AuthenticationFailed.is_transient());
        assert!(!TrendGenError::InvalidRequest("missing topic".into()).is_transient());
        assert!(
            !TrendGenError::Api {
                status: 422,
                message: "bad payload".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn retry_after_only_from_rate_limit() {
        let hint = Duration::from_secs(2);
        assert_eq!(
            TrendGenError::RateLimited {
                retry_after: Some(hint)
            }
            .retry_after(),
            Some(hint)
        );
        assert_eq!(TrendGenError::Http("x".into()).retry_after(), None);
    }
}
