//! Service configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

/// Default width of `text-embedding-3-large` vectors, matching the index's
/// vector field.
pub const DEFAULT_DIMENSIONS: usize = 3072;

/// Configuration for the chat service and its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Base endpoint of the hosted OpenAI service.
    pub openai_endpoint: String,
    /// Base endpoint of the search service.
    pub search_endpoint: String,
    /// Chat model deployment name.
    pub chat_deployment: String,
    /// Embedding model deployment name.
    pub embedding_deployment: String,
    /// API version passed to the OpenAI service.
    pub api_version: String,
    /// Name of the search index holding the product documents.
    pub index_name: String,
    /// Embedding dimensionality; must match the index's vector field width.
    pub dimensions: usize,
    /// Maximum number of passages retrieved per query.
    pub top_k: usize,
    /// Maximum number of history turns forwarded to the completion call.
    pub history_window: usize,
    /// Bound on generated output length, in tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature; kept low for support-policy answers.
    pub temperature: f32,
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_endpoint: "https://aoai-llmops-eastus.openai.azure.com".to_string(),
            search_endpoint: "https://search-llmops-dev-naxfrjtmsmlvo.search.windows.net"
                .to_string(),
            chat_deployment: "gpt-4o".to_string(),
            embedding_deployment: "text-embedding-3-large".to_string(),
            api_version: "2024-02-01".to_string(),
            index_name: "walle-products".to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            top_k: 3,
            history_window: 10,
            max_output_tokens: 500,
            temperature: 0.3,
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl AppConfig {
    /// Create a new builder for constructing an [`AppConfig`].
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Build the configuration from environment variables, falling back to
    /// the demo defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Self::builder()
            .openai_endpoint(env_or("AZURE_OPENAI_ENDPOINT", &defaults.openai_endpoint))
            .search_endpoint(env_or("AZURE_SEARCH_ENDPOINT", &defaults.search_endpoint))
            .chat_deployment(env_or("AZURE_OPENAI_CHAT_DEPLOYMENT", &defaults.chat_deployment))
            .embedding_deployment(env_or(
                "AZURE_OPENAI_EMBEDDING_DEPLOYMENT",
                &defaults.embedding_deployment,
            ))
            .index_name(env_or("AZURE_SEARCH_INDEX_NAME", &defaults.index_name));

        if let Some(host) = std::env::var("WALLE_HOST").ok().filter(|h| !h.is_empty()) {
            builder = builder.host(host);
        }
        if let Some(port) = std::env::var("WALLE_PORT").ok().and_then(|p| p.parse().ok()) {
            builder = builder.port(port);
        }

        builder.build()
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

/// Builder for constructing a validated [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the OpenAI service endpoint.
    pub fn openai_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.openai_endpoint = endpoint.into();
        self
    }

    /// Set the search service endpoint.
    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.search_endpoint = endpoint.into();
        self
    }

    /// Set the chat model deployment name.
    pub fn chat_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.config.chat_deployment = deployment.into();
        self
    }

    /// Set the embedding model deployment name.
    pub fn embedding_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.config.embedding_deployment = deployment.into();
        self
    }

    /// Set the search index name.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    /// Set the embedding dimensionality.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Set the number of passages retrieved per query.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the history window forwarded to the completion call.
    pub fn history_window(mut self, window: usize) -> Self {
        self.config.history_window = window;
        self
    }

    /// Set the bound on generated output length.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the server bind host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server bind port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Build the [`AppConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] if an endpoint is empty, or if
    /// `dimensions`, `top_k`, or `history_window` is zero.
    pub fn build(self) -> Result<AppConfig> {
        if self.config.openai_endpoint.is_empty() {
            return Err(ChatError::Config("openai_endpoint must not be empty".to_string()));
        }
        if self.config.search_endpoint.is_empty() {
            return Err(ChatError::Config("search_endpoint must not be empty".to_string()));
        }
        if self.config.dimensions == 0 {
            return Err(ChatError::Config("dimensions must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(ChatError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.history_window == 0 {
            return Err(ChatError::Config(
                "history_window must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.dimensions, DEFAULT_DIMENSIONS);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let err = AppConfig::builder().top_k(0).build().unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn zero_history_window_is_rejected() {
        let err = AppConfig::builder().history_window(0).build().unwrap_err();
        assert!(err.to_string().contains("history_window"));
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let err = AppConfig::builder().openai_endpoint("").build().unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
