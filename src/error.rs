//! Error types for the `walle-rag` crate.

use thiserror::Error;

/// Errors that can occur while serving a chat turn or provisioning the index.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The embedding service failed or returned an unusable vector.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure, preserving upstream detail.
        message: String,
    },

    /// The search index rejected or failed the retrieval query.
    #[error("Retrieval error ({backend}): {message}")]
    Retrieval {
        /// The search backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The chat-completion service failed, including moderation blocks.
    #[error("Generation error ({model}): {message}")]
    Generation {
        /// The chat model or deployment that produced the error.
        model: String,
        /// Upstream error text, passed through verbatim.
        message: String,
    },

    /// A required request field is missing or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Token acquisition failed for a collaborator scope.
    #[error("Auth error: {0}")]
    Auth(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
