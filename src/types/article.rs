//! Generated article and per-request outcome types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata attached to every generated article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleMetadata {
    /// Word count of the article body.
    pub word_count: usize,

    /// Name of the provider that produced the content.
    pub provider: String,

    /// Wall-clock generation latency in milliseconds (cache hits report
    /// the latency recorded at generation time, not lookup time).
    pub generation_time_ms: u64,

    /// Number of style examples supplied to the provider.
    pub style_examples_used: usize,

    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
}

/// A generated article, owned by the caller after return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedArticle {
    /// Article title.
    pub title: String,

    /// Article body text.
    pub body: String,

    /// Generation metadata.
    pub metadata: ArticleMetadata,
}

/// Terminal outcome of a single orchestrated request.
///
/// Intermediate provider failures are absorbed by the fallback chain, so
/// the only caller-visible rejections are admission denial and the
/// cannot-happen-by-design case of every provider failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RequestOutcome {
    /// Article freshly generated by a provider.
    Completed(GeneratedArticle),

    /// Article served from the result cache.
    CompletedCached(GeneratedArticle),

    /// Admission denied by the rate limiter.
    RejectedThrottled { reason: String },

    /// Provider chain exhausted — an invariant violation when a
    /// deterministic fallback is configured.
    RejectedInternal { reason: String },
}

impl RequestOutcome {
    /// Stable outcome tag for the calling layer.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::CompletedCached(_) => "completed-cached",
            Self::RejectedThrottled { .. } => "rejected-throttled",
            Self::RejectedInternal { .. } => "rejected-internal",
        }
    }

    /// The article, if the request completed.
    pub fn article(&self) -> Option<&GeneratedArticle> {
        match self {
            Self::Completed(article) | Self::CompletedCached(article) => Some(article),
            _ => None,
        }
    }

    /// Whether the request was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::RejectedThrottled { .. } | Self::RejectedInternal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> GeneratedArticle {
        GeneratedArticle {
            title: "t".into(),
            body: "b".into(),
            metadata: ArticleMetadata {
                word_count: 1,
                provider: "template".into(),
                generation_time_ms: 0,
                style_examples_used: 0,
                generated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn outcome_tags_match_contract() {
        assert_eq!(RequestOutcome::Completed(article()).tag(), "completed");
        assert_eq!(
            RequestOutcome::CompletedCached(article()).tag(),
            "completed-cached"
        );
        assert_eq!(
            RequestOutcome::RejectedThrottled { reason: "r".into() }.tag(),
            "rejected-throttled"
        );
        assert_eq!(
            RequestOutcome::RejectedInternal { reason: "r".into() }.tag(),
            "rejected-internal"
        );
    }

    #[test]
    fn rejections_carry_no_article() {
        assert!(
            RequestOutcome::RejectedThrottled { reason: "r".into() }
                .article()
                .is_none()
        );
        assert!(RequestOutcome::Completed(article()).article().is_some());
        assert!(RequestOutcome::RejectedInternal { reason: "r".into() }.is_rejected());
    }

    #[test]
    fn outcome_serializes_with_kebab_case_tag() {
        let json =
            serde_json::to_value(RequestOutcome::RejectedThrottled { reason: "r".into() }).unwrap();
        assert_eq!(json["outcome"], "rejected-throttled");
    }
}
