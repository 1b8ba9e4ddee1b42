//! Index provisioning: schema creation and seeded document upload.
//!
//! Management-plane counterpart of [`crate::retriever`]. Runs once at
//! provisioning time via the `create_index` binary.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::credential::{SEARCH_SCOPE, TokenProvider};
use crate::embedding::EmbeddingProvider;
use crate::error::{ChatError, Result};
use crate::seed::SeedDocument;

/// Administers the search index over its management REST API.
pub struct IndexAdmin {
    client: reqwest::Client,
    endpoint: String,
    index_name: String,
    dimensions: usize,
    token_provider: Arc<dyn TokenProvider>,
}

impl IndexAdmin {
    const API_VERSION: &'static str = "2024-07-01";

    /// Create an index administrator from the service configuration.
    pub fn new(config: &AppConfig, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.search_endpoint.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            dimensions: config.dimensions,
            token_provider,
        }
    }

    fn map_err(&self, message: String) -> ChatError {
        ChatError::Retrieval { backend: self.index_name.clone(), message }
    }

    /// The index schema: projected fields, an HNSW-profiled vector field
    /// sized to the embedding width, and a semantic configuration that
    /// prioritizes title over content.
    fn index_definition(&self) -> serde_json::Value {
        json!({
            "name": self.index_name,
            "fields": [
                {"name": "id", "type": "Edm.String", "key": true, "filterable": true},
                {"name": "title", "type": "Edm.String", "searchable": true, "filterable": true},
                {"name": "category", "type": "Edm.String", "searchable": true, "filterable": true, "facetable": true},
                {"name": "content", "type": "Edm.String", "searchable": true},
                {"name": "last_updated", "type": "Edm.String", "filterable": true, "sortable": true},
                {
                    "name": "content_vector",
                    "type": "Collection(Edm.Single)",
                    "searchable": true,
                    "dimensions": self.dimensions,
                    "vectorSearchProfile": "vector-profile",
                },
            ],
            "vectorSearch": {
                "algorithms": [{"name": "hnsw-config", "kind": "hnsw"}],
                "profiles": [{"name": "vector-profile", "algorithm": "hnsw-config"}],
            },
            "semantic": {
                "configurations": [{
                    "name": "semantic-config",
                    "prioritizedFields": {
                        "titleField": {"fieldName": "title"},
                        "prioritizedContentFields": [{"fieldName": "content"}],
                    },
                }],
            },
        })
    }

    /// Drop any existing index and create it fresh from the schema.
    pub async fn create_index(&self) -> Result<()> {
        let token = self.token_provider.acquire_token(SEARCH_SCOPE).await?;

        // Delete-if-exists; a 404 here just means a first run.
        let delete_url = format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint,
            self.index_name,
            Self::API_VERSION
        );
        match self.client.delete(&delete_url).bearer_auth(&token).send().await {
            Ok(response) if response.status().is_success() => {
                info!(index = %self.index_name, "deleted existing index");
            }
            Ok(_) | Err(_) => {
                debug!(index = %self.index_name, "no existing index to delete");
            }
        }

        let create_url = format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint,
            self.index_name,
            Self::API_VERSION
        );
        let response = self
            .client
            .put(&create_url)
            .bearer_auth(&token)
            .json(&self.index_definition())
            .send()
            .await
            .map_err(|e| self.map_err(format!("index creation request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_err(format!("index creation returned {status}: {body}")));
        }

        info!(index = %self.index_name, dimensions = self.dimensions, "created index");
        Ok(())
    }

    /// Embed and upload the given documents.
    ///
    /// Documents embed one at a time; the first embedding or upload failure
    /// aborts the run with the document id in the error.
    pub async fn upload(
        &self,
        documents: &[SeedDocument],
        embedding_provider: &dyn EmbeddingProvider,
    ) -> Result<usize> {
        if embedding_provider.dimensions() != self.dimensions {
            return Err(self.map_err(format!(
                "embedding provider produces {} dimensions, index expects {}",
                embedding_provider.dimensions(),
                self.dimensions
            )));
        }

        let mut actions = Vec::with_capacity(documents.len());
        for document in documents {
            debug!(document.id = %document.id, "embedding document");
            let embedding =
                embedding_provider.embed(&document.content).await.map_err(|e| {
                    self.map_err(format!("embedding failed for document '{}': {e}", document.id))
                })?;

            actions.push(json!({
                "@search.action": "mergeOrUpload",
                "id": document.id,
                "title": document.title,
                "category": document.category,
                "content": document.content,
                "last_updated": document.last_updated,
                "content_vector": embedding,
            }));
        }

        let token = self.token_provider.acquire_token(SEARCH_SCOPE).await?;
        let upload_url = format!(
            "{}/indexes/{}/docs/index?api-version={}",
            self.endpoint,
            self.index_name,
            Self::API_VERSION
        );

        let response = self
            .client
            .post(&upload_url)
            .bearer_auth(&token)
            .json(&json!({"value": actions}))
            .send()
            .await
            .map_err(|e| self.map_err(format!("upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.map_err(format!("upload returned {status}: {body}")));
        }

        let indexed = documents.len();
        if indexed == 0 {
            warn!(index = %self.index_name, "upload called with no documents");
        } else {
            info!(index = %self.index_name, count = indexed, "indexed documents");
        }
        Ok(indexed)
    }
}
