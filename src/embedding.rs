//! Embedding provider trait for turning text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates a fixed-width vector embedding for text input.
///
/// Implementations wrap an external embedding service behind a unified async
/// interface. Contract:
///
/// - input text must be non-empty; implementations reject empty input with a
///   descriptive error rather than calling out,
/// - the returned vector has exactly [`dimensions()`](EmbeddingProvider::dimensions)
///   entries,
/// - one outbound call per invocation; no retries, no caching.
///
/// # Example
///
/// ```rust,ignore
/// use walle_rag::EmbeddingProvider;
///
/// let embedding = provider.embed("What is the warranty on laptops?").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
