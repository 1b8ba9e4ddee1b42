//! Provision the product search index and upload the seed corpus.

use std::sync::Arc;

use tracing::info;

use walle_rag::AppConfig;
use walle_rag::credential::{CachedTokenProvider, TokenProvider, TokenProviderChain};
use walle_rag::indexer::IndexAdmin;
use walle_rag::openai::OpenAiEmbeddingProvider;
use walle_rag::seed::seed_documents;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let token_provider: Arc<dyn TokenProvider> =
        Arc::new(CachedTokenProvider::new(Arc::new(TokenProviderChain::default_chain())));

    let embedding_provider = OpenAiEmbeddingProvider::new(&config, token_provider.clone());
    let admin = IndexAdmin::new(&config, token_provider);

    info!(index = %config.index_name, endpoint = %config.search_endpoint, "provisioning index");
    admin.create_index().await?;

    let documents = seed_documents();
    let indexed = admin.upload(&documents, &embedding_provider).await?;
    info!(indexed, "index provisioning complete");

    Ok(())
}
