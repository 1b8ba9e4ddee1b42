//! Clients for the hosted OpenAI service: embeddings and chat completions.
//!
//! Both clients call deployment-scoped REST endpoints and authenticate with a
//! bearer token from the injected [`TokenProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::chat::{ChatModel, Completion, Message, SamplingParams, TokenUsage};
use crate::config::AppConfig;
use crate::credential::{COGNITIVE_SCOPE, TokenProvider};
use crate::embedding::EmbeddingProvider;
use crate::error::{ChatError, Result};

// ── Shared API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the upstream error message from a failure body, falling back to
/// the raw text when it is not the documented shape.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

// ── Embedding provider ─────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// An [`EmbeddingProvider`] backed by a hosted embedding deployment.
///
/// Calls `/openai/deployments/{deployment}/embeddings` directly with
/// `reqwest`. Rejects empty input before any network I/O, and rejects
/// responses whose vector width does not match the configured dimensions —
/// a drifted deployment must fail here, not at retrieval time.
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    dimensions: usize,
    token_provider: Arc<dyn TokenProvider>,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider from the service configuration.
    pub fn new(config: &AppConfig, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.openai_endpoint.trim_end_matches('/').to_string(),
            deployment: config.embedding_deployment.clone(),
            api_version: config.api_version.clone(),
            dimensions: config.dimensions,
            token_provider,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(ChatError::Embedding {
                provider: self.deployment.clone(),
                message: "input text must not be empty".to_string(),
            });
        }

        debug!(deployment = %self.deployment, text_len = text.len(), "embedding text");

        let token = self.token_provider.acquire_token(COGNITIVE_SCOPE).await?;

        let response = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&EmbeddingRequest { input: text })
            .send()
            .await
            .map_err(|e| {
                error!(deployment = %self.deployment, error = %e, "embedding request failed");
                ChatError::Embedding {
                    provider: self.deployment.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(deployment = %self.deployment, %status, "embedding service error");
            return Err(ChatError::Embedding {
                provider: self.deployment.clone(),
                message: format!("service returned {status}: {detail}"),
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| ChatError::Embedding {
            provider: self.deployment.clone(),
            message: format!("failed to parse response: {e}"),
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ChatError::Embedding {
                provider: self.deployment.clone(),
                message: "service returned no embedding".to_string(),
            })?;

        if embedding.len() != self.dimensions {
            return Err(ChatError::Embedding {
                provider: self.deployment.clone(),
                message: format!(
                    "expected {} dimensions, service returned {}",
                    self.dimensions,
                    embedding.len()
                ),
            });
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat model ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// A [`ChatModel`] backed by a hosted chat-completion deployment.
///
/// Moderation blocks arrive on this error channel like any other upstream
/// failure: the refusal text is preserved in [`ChatError::Generation`], and
/// nothing here inspects or classifies it.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    token_provider: Arc<dyn TokenProvider>,
}

impl OpenAiChatModel {
    /// Create a chat model client from the service configuration.
    pub fn new(config: &AppConfig, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.openai_endpoint.trim_end_matches('/').to_string(),
            deployment: config.chat_deployment.clone(),
            api_version: config.api_version.clone(),
            token_provider,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.deployment
    }

    async fn complete(&self, messages: &[Message], params: &SamplingParams) -> Result<Completion> {
        debug!(
            deployment = %self.deployment,
            message_count = messages.len(),
            max_tokens = params.max_output_tokens,
            temperature = params.temperature,
            "requesting completion"
        );

        let token = self.token_provider.acquire_token(COGNITIVE_SCOPE).await?;

        let request_body = ChatCompletionRequest {
            messages,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(deployment = %self.deployment, error = %e, "completion request failed");
                ChatError::Generation {
                    model: self.deployment.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(deployment = %self.deployment, %status, "completion service error");
            return Err(ChatError::Generation {
                model: self.deployment.clone(),
                message: format!("service returned {status}: {detail}"),
            });
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| ChatError::Generation {
                model: self.deployment.clone(),
                message: format!("failed to parse response: {e}"),
            })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ChatError::Generation {
                model: self.deployment.clone(),
                message: "service returned no completion choices".to_string(),
            })?;

        Ok(Completion { text, usage: parsed.usage })
    }
}
