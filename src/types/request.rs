//! Generation request type and its cache fingerprint.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Maximum number of keywords retained on a request.
pub const MAX_KEYWORDS: usize = 10;

/// Optional style parameters steering generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleParameters {
    /// Industry context (e.g. "retail", "fintech").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Desired article length in words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_length: Option<usize>,

    /// Include a market-indicator / statistics section.
    #[serde(default)]
    pub include_statistics: bool,

    /// Include an illustrative case-study section.
    #[serde(default)]
    pub include_case_studies: bool,

    /// Close the article with a call to action.
    #[serde(default)]
    pub include_call_to_action: bool,
}

/// A validated request for article generation.
///
/// Constructed via [`GenerationRequest::new`] plus builder methods, then
/// immutable for the lifetime of the orchestration. Structural validation
/// (non-empty topic, known category, 1-10 keywords) is the responsibility
/// of the calling layer; this type only normalizes keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Article topic.
    pub topic: String,

    /// Business category (e.g. "Technology", "Futurist", "Marketing").
    pub category: String,

    /// Keywords, lowercase-normalized, order-preserving, at most
    /// [`MAX_KEYWORDS`].
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Intended readership.
    #[serde(default = "default_target_audience")]
    pub target_audience: String,

    /// Writing tone.
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Optional style parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleParameters>,
}

fn default_target_audience() -> String {
    "Business Leaders and Tech Professionals".to_string()
}

fn default_tone() -> String {
    "Professional and Insightful".to_string()
}

impl GenerationRequest {
    /// Create a request with the given topic and category.
    pub fn new(topic: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            category: category.into(),
            keywords: Vec::new(),
            target_audience: default_target_audience(),
            tone: default_tone(),
            style: None,
        }
    }

    /// Set the keyword list.
    ///
    /// Keywords are trimmed, lowercased, deduplicated (first occurrence
    /// wins), and truncated to [`MAX_KEYWORDS`]. Empty entries are dropped.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = normalize_keywords(keywords);
        self
    }

    /// Set the target audience.
    pub fn target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    /// Set the writing tone.
    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    /// Set optional style parameters.
    pub fn style(mut self, style: StyleParameters) -> Self {
        self.style = Some(style);
        self
    }

    /// Deterministic cache fingerprint over all request fields.
    ///
    /// Fields are hashed in declaration order, so two requests with
    /// identical contents produce the same fingerprint regardless of how
    /// they were assembled. The hash is stable within a process lifetime,
    /// which is sufficient for the in-memory cache; a distributed backend
    /// would need a cross-process stable hash instead.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.topic.hash(&mut hasher);
        self.category.hash(&mut hasher);
        self.keywords.hash(&mut hasher);
        self.target_audience.hash(&mut hasher);
        self.tone.hash(&mut hasher);
        match &self.style {
            Some(style) => {
                1u8.hash(&mut hasher);
                style.industry.hash(&mut hasher);
                style.target_length.hash(&mut hasher);
                style.include_statistics.hash(&mut hasher);
                style.include_case_studies.hash(&mut hasher);
                style.include_call_to_action.hash(&mut hasher);
            }
            None => 0u8.hash(&mut hasher),
        }
        hasher.finish()
    }

    /// Query text used for style-example retrieval.
    pub fn style_query(&self) -> String {
        let mut query = format!("{} {}", self.topic, self.category);
        for keyword in &self.keywords {
            query.push(' ');
            query.push_str(keyword);
        }
        query
    }
}

fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for keyword in keywords {
        let cleaned = keyword.as_ref().trim().to_lowercase();
        if cleaned.is_empty() || normalized.contains(&cleaned) {
            continue;
        }
        normalized.push(cleaned);
        if normalized.len() == MAX_KEYWORDS {
            break;
        }
    }
    normalized
}
