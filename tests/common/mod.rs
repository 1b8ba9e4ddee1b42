//! Shared stub collaborators for the black-box tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use walle_rag::chat::{ChatModel, Completion, Message, SamplingParams, TokenUsage};
use walle_rag::embedding::EmbeddingProvider;
use walle_rag::error::{ChatError, Result};
use walle_rag::retriever::{Category, Passage, Retrieval, Retriever};
use walle_rag::server::AppState;
use walle_rag::{AppConfig, RagPipeline};

pub const STUB_MODEL_NAME: &str = "stub-gpt";
pub const STUB_DIMS: usize = 8;

/// Embedder returning a fixed vector of the configured width.
pub struct FixedEmbedder {
    pub dims: usize,
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(ChatError::Embedding {
                provider: "stub".to_string(),
                message: "input text must not be empty".to_string(),
            });
        }
        Ok(vec![0.1; self.dims])
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// What the stub retriever should do on each call.
pub enum RetrieverBehavior {
    Hits(Vec<Passage>),
    NoMatch,
    Fail,
}

/// Retriever with scripted behavior and a call counter.
pub struct StubRetriever {
    pub behavior: RetrieverBehavior,
    pub calls: AtomicUsize,
}

impl StubRetriever {
    pub fn new(behavior: RetrieverBehavior) -> Arc<Self> {
        Arc::new(Self { behavior, calls: AtomicUsize::new(0) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn retrieve(
        &self,
        _query_text: &str,
        _query_vector: &[f32],
        top_k: usize,
    ) -> Result<Retrieval> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            RetrieverBehavior::Hits(passages) => {
                let mut passages = passages.clone();
                passages.truncate(top_k);
                Ok(Retrieval::Passages(passages))
            }
            RetrieverBehavior::NoMatch => Ok(Retrieval::NoMatch),
            RetrieverBehavior::Fail => Err(ChatError::Retrieval {
                backend: "stub".to_string(),
                message: "search service unavailable".to_string(),
            }),
        }
    }
}

/// Chat model that records every message list it receives.
pub struct RecordingChatModel {
    pub reply: String,
    pub usage: Option<TokenUsage>,
    pub fail: bool,
    pub requests: Mutex<Vec<Vec<Message>>>,
}

impl RecordingChatModel {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 40,
                total_tokens: 160,
            }),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            usage: None,
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// The message lists received so far, oldest first.
    pub fn recorded(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RecordingChatModel {
    fn name(&self) -> &str {
        STUB_MODEL_NAME
    }

    async fn complete(&self, messages: &[Message], _params: &SamplingParams) -> Result<Completion> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(ChatError::Generation {
                model: STUB_MODEL_NAME.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        Ok(Completion { text: self.reply.clone(), usage: self.usage.clone() })
    }
}

pub fn warranty_passage() -> Passage {
    Passage {
        title: "Warranty Policy".to_string(),
        category: Category::Policy,
        content: "Laptops and Computers: 2 years from date of purchase".to_string(),
        last_updated: "2025-01-20".to_string(),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::builder().dimensions(STUB_DIMS).build().unwrap()
}

pub fn test_pipeline(
    retriever: Arc<StubRetriever>,
    chat_model: Arc<RecordingChatModel>,
) -> Arc<RagPipeline> {
    Arc::new(
        RagPipeline::builder()
            .config(test_config())
            .embedding_provider(Arc::new(FixedEmbedder { dims: STUB_DIMS }))
            .retriever(retriever)
            .chat_model(chat_model)
            .build()
            .expect("build test pipeline"),
    )
}

pub async fn spawn_server(pipeline: Arc<RagPipeline>) -> (String, tokio::task::JoinHandle<()>) {
    let app = walle_rag::app_router(AppState { pipeline });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    (format!("http://{}", addr), handle)
}
