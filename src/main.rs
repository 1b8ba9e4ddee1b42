use std::sync::Arc;

use walle_rag::credential::{CachedTokenProvider, TokenProvider, TokenProviderChain};
use walle_rag::openai::{OpenAiChatModel, OpenAiEmbeddingProvider};
use walle_rag::retriever::SearchIndexRetriever;
use walle_rag::server::{AppState, run_server};
use walle_rag::{AppConfig, RagPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let token_provider: Arc<dyn TokenProvider> =
        Arc::new(CachedTokenProvider::new(Arc::new(TokenProviderChain::default_chain())));

    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(OpenAiEmbeddingProvider::new(
            &config,
            token_provider.clone(),
        )))
        .retriever(Arc::new(SearchIndexRetriever::new(&config, token_provider.clone())))
        .chat_model(Arc::new(OpenAiChatModel::new(&config, token_provider)))
        .config(config)
        .build()?;

    run_server(AppState { pipeline: Arc::new(pipeline) }).await
}
