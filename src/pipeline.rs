//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] runs one chat turn: embed the question, retrieve grounding
//! passages, assemble the prompt, and request a completion. The three stages
//! run strictly sequentially; the pipeline holds no state across calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use walle_rag::{RagPipeline, AppConfig};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(AppConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .retriever(Arc::new(retriever))
//!     .chat_model(Arc::new(model))
//!     .build()?;
//!
//! let outcome = pipeline.answer("What is the warranty on laptops?", &[], true).await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::chat::{ChatModel, Message, SamplingParams, TokenUsage};
use crate::config::AppConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{ChatError, Result};
use crate::prompt;
use crate::retriever::Retriever;

/// The result of one chat turn.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatOutcome {
    /// The generated answer text.
    pub response: String,
    /// Whether retrieved context grounded this answer.
    pub context_used: bool,
    /// The chat deployment that produced the answer.
    pub model: String,
    /// Token accounting, when the upstream service reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// The RAG chat pipeline.
///
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: AppConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    retriever: Arc<dyn Retriever>,
    chat_model: Arc<dyn ChatModel>,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline").field("config", &self.config).finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The chat deployment name, as reported to API callers.
    pub fn model_name(&self) -> &str {
        self.chat_model.name()
    }

    /// Answer one chat turn.
    ///
    /// When `use_rag` is set, the question is embedded and the index queried
    /// for grounding passages first. A failure on that path degrades to an
    /// ungrounded answer rather than failing the turn; only validation and
    /// generation errors surface to the caller.
    ///
    /// # Errors
    ///
    /// - [`ChatError::Validation`] if `message` is empty.
    /// - [`ChatError::Generation`] if the completion call fails.
    pub async fn answer(
        &self,
        message: &str,
        history: &[Message],
        use_rag: bool,
    ) -> Result<ChatOutcome> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("Message is required".to_string()));
        }

        let context = if use_rag { self.fetch_context(message).await } else { None };
        let context_used = context.is_some();

        let messages = prompt::build_messages(
            context.as_deref(),
            history,
            message,
            self.config.history_window,
        );

        let params = SamplingParams {
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        let completion = self.chat_model.complete(&messages, &params).await?;

        info!(
            context_used,
            history_len = history.len(),
            model = self.chat_model.name(),
            "chat turn completed"
        );

        Ok(ChatOutcome {
            response: completion.text,
            context_used,
            model: self.chat_model.name().to_string(),
            usage: completion.usage,
        })
    }

    /// Embed the question and query the index, rendering any hits as context.
    ///
    /// Failures degrade to `None` so a search outage never takes the chat
    /// surface down with it.
    async fn fetch_context(&self, message: &str) -> Option<String> {
        let query_vector = match self.embedding_provider.embed(message).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "embedding failed, continuing without context");
                return None;
            }
        };

        match self.retriever.retrieve(message, &query_vector, self.config.top_k).await {
            Ok(retrieval) => retrieval.to_context(),
            Err(e) => {
                warn!(error = %e, "retrieval failed, continuing without context");
                None
            }
        }
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields except `config` are required; `config` defaults when unset.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<AppConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    retriever: Option<Arc<dyn Retriever>>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the retrieval backend.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Build the [`RagPipeline`], validating that all collaborators are set.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] if any required collaborator is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = match self.config {
            Some(config) => config,
            None => AppConfig::builder().build()?,
        };
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            ChatError::Config("embedding_provider is required".to_string())
        })?;
        let retriever = self
            .retriever
            .ok_or_else(|| ChatError::Config("retriever is required".to_string()))?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| ChatError::Config("chat_model is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, retriever, chat_model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_all_collaborators() {
        let err = RagPipeline::builder().build().unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(err.to_string().contains("embedding_provider"));
    }
}
