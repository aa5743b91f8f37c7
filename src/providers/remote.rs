//! Remote OpenAI-compatible chat-completions provider.
//!
//! Covers both the primary and secondary remote endpoints; they differ
//! only in name, base URL, credentials, and model. Timeouts are enforced
//! by the chain, not here, so a hung endpoint cannot stall a request
//! beyond its per-attempt budget.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::style::ReferenceArticle;
use crate::types::GenerationRequest;
use crate::{Result, TrendGenError};

use super::prompt::{build_system_prompt, build_user_prompt};
use super::traits::{ArticleProvider, ProviderArticle};

/// Sampling temperature used when none is configured.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Provider for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct RemoteProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl RemoteProvider {
    /// Create a provider against `base_url` (scheme and host, no trailing
    /// path), generating with `model`.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        }
    }

    /// Set the bearer token sent with each request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match status.as_u16() {
            401 | 403 => Err(TrendGenError::AuthenticationFailed),
            400 | 404 | 422 => Err(TrendGenError::InvalidRequest(format!(
                "{} rejected the request: {status}",
                self.name
            ))),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(TrendGenError::RateLimited { retry_after })
            }
            code => Err(TrendGenError::Api {
                status: code,
                message: format!("{} API error: {status}", self.name),
            }),
        }
    }
}

#[async_trait]
impl ArticleProvider for RemoteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ProviderArticle> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(style_examples),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(request),
                },
            ],
            temperature: self.temperature,
        };

        let mut http_request = self.client.post(&url).json(&payload);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        debug!(provider = %self.name, model = %self.model, "sending chat completion request");
        let response = http_request
            .send()
            .await
            .map_err(|e| TrendGenError::Http(e.to_string()))?;
        self.handle_response_errors(&response)?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| TrendGenError::Http(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(TrendGenError::EmptyResponse);
        }

        Ok(split_title(&content, &request.topic))
    }
}

/// Split model output into title and body.
///
/// The first non-empty line (stripped of markdown heading markers) becomes
/// the title; a synthesized title is used when the output has no further
/// body to separate.
fn split_title(content: &str, topic: &str) -> ProviderArticle {
    let trimmed = content.trim();
    let mut lines = trimmed.splitn(2, '\n');
    let first = lines.next().unwrap_or_default();
    let rest = lines.next().unwrap_or_default().trim();
    let title = first.trim_start_matches('#').trim();
    if title.is_empty() || rest.is_empty() {
        ProviderArticle {
            title: format!("{topic}: Insights and Analysis"),
            body: trimmed.to_string(),
        }
    } else {
        ProviderArticle {
            title: title.to_string(),
            body: rest.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
