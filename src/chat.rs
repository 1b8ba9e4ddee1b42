//! Message and completion types, plus the chat model trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and grounding context.
    System,
    /// The end user.
    User,
    /// The model's prior answers.
    Assistant,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who authored this turn.
    pub role: Role,
    /// The turn's text.
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Token accounting reported by the completion service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens.
    pub total_tokens: u32,
}

/// A generated completion with optional usage accounting.
///
/// Usage is only present when the upstream service supplies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The generated answer text.
    pub text: String,
    /// Token accounting, when reported upstream.
    pub usage: Option<TokenUsage>,
}

/// Sampling parameters forwarded to the completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Bound on generated output length, in tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A hosted chat-completion model.
///
/// Implementations forward the ordered message list unmodified; prompt
/// assembly and history truncation happen before this seam.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model or deployment name, reported back to API callers.
    fn name(&self) -> &str;

    /// Request a completion for the given messages.
    async fn complete(&self, messages: &[Message], params: &SamplingParams) -> Result<Completion>;
}
