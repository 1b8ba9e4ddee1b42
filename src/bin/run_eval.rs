//! Run the evaluation dataset through the deployed pipeline and write a
//! report for the external scoring service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use walle_rag::credential::{CachedTokenProvider, TokenProvider, TokenProviderChain};
use walle_rag::eval;
use walle_rag::openai::{OpenAiChatModel, OpenAiEmbeddingProvider};
use walle_rag::retriever::SearchIndexRetriever;
use walle_rag::{AppConfig, RagPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let dataset_path = std::env::var("WALLE_EVAL_DATASET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/eval_dataset.jsonl"));
    let results_dir = std::env::var("WALLE_EVAL_RESULTS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("eval_results"));

    let raw = std::fs::read_to_string(&dataset_path)
        .with_context(|| format!("failed to read dataset {}", dataset_path.display()))?;
    let cases = eval::parse_dataset(&raw)
        .with_context(|| format!("malformed dataset {}", dataset_path.display()))?;
    info!(cases = cases.len(), dataset = %dataset_path.display(), "loaded evaluation dataset");

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

    let report = eval::run(&pipeline, &cases).await;

    std::fs::create_dir_all(&results_dir)
        .with_context(|| format!("failed to create {}", results_dir.display()))?;
    let out_path = results_dir.join(format!(
        "eval_results_{}.json",
        report.summary.started_at.format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&out_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(
        run_id = %report.summary.run_id,
        answered = report.summary.answered,
        failed = report.summary.failed,
        grounded = report.summary.grounded,
        results = %out_path.display(),
        "evaluation report written"
    );

    Ok(())
}
