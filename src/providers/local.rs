//! Local model provider speaking the Ollama generate API.
//!
//! Talks to a co-located inference server over loopback. Slower and less
//! capable than the remote endpoints, so it sits late in the chain, but
//! it keeps generation available when the network or remote quotas fail.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::style::ReferenceArticle;
use crate::types::GenerationRequest;
use crate::{Result, TrendGenError};

use super::prompt::{build_system_prompt, build_user_prompt};
use super::traits::{ArticleProvider, ProviderArticle};

/// Provider for a local `/api/generate` endpoint.
pub struct LocalModelProvider {
    name: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl LocalModelProvider {
    /// Create a provider against a local inference server.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }
}

#[async_trait]
impl ArticleProvider for LocalModelProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        style_examples: &[Arc<ReferenceArticle>],
    ) -> Result<ProviderArticle> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = format!(
            "{}\n\n{}",
            build_system_prompt(style_examples),
            build_user_prompt(request)
        );
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(provider = %self.name, model = %self.model, "sending local generate request");
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TrendGenError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrendGenError::Api {
                status: status.as_u16(),
                message: format!("{} API error: {status}", self.name),
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TrendGenError::Http(e.to_string()))?;
        let body = generated.response.trim().to_string();
        if body.is_empty() {
            return Err(TrendGenError::EmptyResponse);
        }

        Ok(ProviderArticle {
            title: format!("{}: Insights and Analysis", request.topic),
            body,
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
