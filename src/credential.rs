//! Credential provider abstraction for collaborator authentication.
//!
//! Every external client receives an injected [`TokenProvider`] instead of
//! resolving credentials ad hoc. The provider is constructed once per process;
//! tokens are immutable until expiry, so the cache needs no coordination
//! beyond a read/write lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{ChatError, Result};

/// Token scope for the hosted OpenAI service.
pub const COGNITIVE_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Token scope for the search service.
pub const SEARCH_SCOPE: &str = "https://search.azure.com/.default";

/// A provider of bearer tokens for collaborator scopes.
///
/// One method, per the injected-credential design: callers request a token
/// for a scope and treat the result as opaque.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a bearer token for the given scope.
    async fn acquire_token(&self, scope: &str) -> Result<String>;
}

// ── Managed identity (instance metadata endpoint) ──────────────────

const IMDS_TOKEN_URL: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

#[derive(Deserialize)]
struct ImdsTokenResponse {
    access_token: String,
}

/// A [`TokenProvider`] backed by the instance metadata service.
///
/// This is the deployed-to-cloud path: the platform issues tokens for the
/// machine's managed identity, no secrets involved.
pub struct ManagedIdentityTokenProvider {
    client: reqwest::Client,
}

impl ManagedIdentityTokenProvider {
    /// Create a new managed identity provider with a short probe timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for ManagedIdentityTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for ManagedIdentityTokenProvider {
    async fn acquire_token(&self, scope: &str) -> Result<String> {
        // The metadata endpoint takes a resource URI, not a scope.
        let resource = scope.trim_end_matches("/.default");

        let response = self
            .client
            .get(IMDS_TOKEN_URL)
            .header("Metadata", "true")
            .query(&[("api-version", "2018-02-01"), ("resource", resource)])
            .send()
            .await
            .map_err(|e| ChatError::Auth(format!("managed identity unavailable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Auth(format!(
                "managed identity token request returned {status}: {body}"
            )));
        }

        let token: ImdsTokenResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Auth(format!("invalid managed identity response: {e}")))?;

        debug!(scope, "acquired token via managed identity");
        Ok(token.access_token)
    }
}

// ── Environment token (local developer path) ───────────────────────

/// A [`TokenProvider`] that reads a pre-acquired bearer token from an
/// environment variable, e.g. one minted by a developer CLI login.
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Create a provider reading from the given environment variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn acquire_token(&self, _scope: &str) -> Result<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ChatError::Auth(format!("{} is not set", self.var)))
    }
}

// ── Fallback chain ─────────────────────────────────────────────────

/// A [`TokenProvider`] that tries a sequence of providers in order,
/// returning the first token acquired.
///
/// Mirrors the managed-identity-then-local-developer fallback of the
/// reference deployment.
pub struct TokenProviderChain {
    providers: Vec<Arc<dyn TokenProvider>>,
}

impl TokenProviderChain {
    /// Create a chain over the given providers, tried front to back.
    pub fn new(providers: Vec<Arc<dyn TokenProvider>>) -> Self {
        Self { providers }
    }

    /// The default chain: managed identity first, then the
    /// `WALLE_BEARER_TOKEN` environment variable.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Arc::new(ManagedIdentityTokenProvider::new()),
            Arc::new(EnvTokenProvider::new("WALLE_BEARER_TOKEN")),
        ])
    }
}

#[async_trait]
impl TokenProvider for TokenProviderChain {
    async fn acquire_token(&self, scope: &str) -> Result<String> {
        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.acquire_token(scope).await {
                Ok(token) => return Ok(token),
                Err(e) => {
                    warn!(scope, error = %e, "token provider failed, trying next");
                    failures.push(e.to_string());
                }
            }
        }
        Err(ChatError::Auth(format!(
            "no token provider succeeded for scope '{scope}': {}",
            failures.join("; ")
        )))
    }
}

// ── Per-scope cache ────────────────────────────────────────────────

/// A [`TokenProvider`] that caches tokens per scope with a fixed lifetime.
///
/// The inner provider's tokens are opaque, so expiry is approximated with a
/// conservative TTL rather than parsed from the token.
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    ttl: Duration,
    cache: RwLock<HashMap<String, (String, Instant)>>,
}

impl CachedTokenProvider {
    /// Wrap a provider with a five-minute per-scope cache.
    pub fn new(inner: Arc<dyn TokenProvider>) -> Self {
        Self::with_ttl(inner, Duration::from_secs(300))
    }

    /// Wrap a provider with an explicit cache lifetime.
    pub fn with_ttl(inner: Arc<dyn TokenProvider>, ttl: Duration) -> Self {
        Self { inner, ttl, cache: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn acquire_token(&self, scope: &str) -> Result<String> {
        {
            let cache = self.cache.read().await;
            if let Some((token, acquired_at)) = cache.get(scope) {
                if acquired_at.elapsed() < self.ttl {
                    return Ok(token.clone());
                }
            }
        }

        let token = self.inner.acquire_token(scope).await?;
        let mut cache = self.cache.write().await;
        cache.insert(scope.to_string(), (token.clone(), Instant::now()));
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self { calls: AtomicUsize::new(0), fail }
        }
    }

    #[async_trait]
    impl TokenProvider for CountingProvider {
        async fn acquire_token(&self, scope: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ChatError::Auth("unavailable".to_string()))
            } else {
                Ok(format!("token-for-{scope}"))
            }
        }
    }

    #[tokio::test]
    async fn chain_falls_back_to_next_provider() {
        let chain = TokenProviderChain::new(vec![
            Arc::new(CountingProvider::new(true)),
            Arc::new(CountingProvider::new(false)),
        ]);
        let token = chain.acquire_token(SEARCH_SCOPE).await.unwrap();
        assert_eq!(token, format!("token-for-{SEARCH_SCOPE}"));
    }

    #[tokio::test]
    async fn chain_reports_all_failures() {
        let chain = TokenProviderChain::new(vec![
            Arc::new(CountingProvider::new(true)),
            Arc::new(CountingProvider::new(true)),
        ]);
        let err = chain.acquire_token(COGNITIVE_SCOPE).await.unwrap_err();
        assert!(matches!(err, ChatError::Auth(_)));
        assert!(err.to_string().contains(COGNITIVE_SCOPE));
    }

    #[tokio::test]
    async fn cache_serves_repeat_requests_without_refetching() {
        let inner = Arc::new(CountingProvider::new(false));
        let cached = CachedTokenProvider::new(inner.clone());

        cached.acquire_token("scope-a").await.unwrap();
        cached.acquire_token("scope-a").await.unwrap();
        cached.acquire_token("scope-b").await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_cache_entries_are_refreshed() {
        let inner = Arc::new(CountingProvider::new(false));
        let cached = CachedTokenProvider::with_ttl(inner.clone(), Duration::ZERO);

        cached.acquire_token("scope-a").await.unwrap();
        cached.acquire_token("scope-a").await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
