//! Retrieval against the managed search index.
//!
//! One hybrid query (lexical match + vectorized query + semantic ranking)
//! with server-side relevance fusion. The returned order is authoritative;
//! nothing here re-ranks.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::credential::{SEARCH_SCOPE, TokenProvider};
use crate::error::{ChatError, Result};

/// Name of the index's vector field.
const VECTOR_FIELD: &str = "content_vector";

/// Name of the index's semantic ranking configuration.
const SEMANTIC_CONFIG: &str = "semantic-config";

/// Document category in the product index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    /// Store policies: returns, warranty, shipping.
    Policy,
    /// Product guides and specifications.
    Product,
    /// Troubleshooting and contact information.
    Support,
}

/// A retrieved passage: the projected document fields only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Document title.
    pub title: String,
    /// Document category.
    pub category: Category,
    /// Full document content.
    pub content: String,
    /// Date the document was last updated, as stored in the index.
    pub last_updated: String,
}

/// The outcome of a retrieval query.
///
/// Zero hits are an explicit sentinel rather than an empty list, so prompt
/// assembly can omit the grounding section cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// Ranked passages, at most `top_k` of them.
    Passages(Vec<Passage>),
    /// The index returned no relevant documents.
    NoMatch,
}

impl Retrieval {
    /// Render the retrieval as grounding context for the system prompt.
    ///
    /// Returns `None` for [`Retrieval::NoMatch`]; passages render as
    /// delimited `Source N` blocks in rank order.
    pub fn to_context(&self) -> Option<String> {
        let passages = match self {
            Retrieval::Passages(passages) if !passages.is_empty() => passages,
            _ => return None,
        };

        let blocks: Vec<String> = passages
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "---\nSource {}: {}\nCategory: {:?}\nLast Updated: {}\n\n{}\n---",
                    i + 1,
                    p.title,
                    p.category,
                    p.last_updated,
                    p.content
                )
            })
            .collect();

        Some(blocks.join("\n"))
    }
}

/// A retrieval backend for the chat pipeline.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Run a hybrid query and return at most `top_k` ranked passages.
    ///
    /// `query_vector` must match the index's vector field width; a mismatch
    /// is rejected before any call goes out, never truncated or padded.
    async fn retrieve(
        &self,
        query_text: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Retrieval>;
}

#[derive(Deserialize)]
struct SearchResponse {
    value: Vec<Passage>,
}

/// A [`Retriever`] backed by the managed search index's REST API.
pub struct SearchIndexRetriever {
    client: reqwest::Client,
    endpoint: String,
    index_name: String,
    dimensions: usize,
    token_provider: Arc<dyn TokenProvider>,
}

impl SearchIndexRetriever {
    /// API version of the search REST surface.
    const API_VERSION: &'static str = "2024-07-01";

    /// Create a retriever from the service configuration.
    pub fn new(config: &AppConfig, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.search_endpoint.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            dimensions: config.dimensions,
            token_provider,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint,
            self.index_name,
            Self::API_VERSION
        )
    }

    fn map_err(&self, message: String) -> ChatError {
        ChatError::Retrieval { backend: self.index_name.clone(), message }
    }
}

#[async_trait]
impl Retriever for SearchIndexRetriever {
    async fn retrieve(
        &self,
        query_text: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Retrieval> {
        if top_k == 0 {
            return Err(self.map_err("top_k must be greater than zero".to_string()));
        }
        if query_vector.len() != self.dimensions {
            return Err(self.map_err(format!(
                "query vector has {} dimensions, index expects {}",
                query_vector.len(),
                self.dimensions
            )));
        }

        let body = json!({
            "search": query_text,
            "vectorQueries": [{
                "kind": "vector",
                "vector": query_vector,
                "k": top_k,
                "fields": VECTOR_FIELD,
            }],
            "queryType": "semantic",
            "semanticConfiguration": SEMANTIC_CONFIG,
            "top": top_k,
            "select": "title,category,content,last_updated",
        });

        let token = self.token_provider.acquire_token(SEARCH_SCOPE).await?;

        let response = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(index = %self.index_name, error = %e, "search request failed");
                self.map_err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(index = %self.index_name, %status, "search service error");
            return Err(self.map_err(format!("service returned {status}: {detail}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| self.map_err(format!("failed to parse response: {e}")))?;

        let mut passages = parsed.value;
        passages.truncate(top_k);

        debug!(index = %self.index_name, hit_count = passages.len(), "retrieval completed");

        if passages.is_empty() {
            return Ok(Retrieval::NoMatch);
        }
        Ok(Retrieval::Passages(passages))
    }
}
