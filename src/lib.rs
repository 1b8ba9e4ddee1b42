//! `walle-rag` is a retrieval-augmented support chatbot for Wall-E
//! Electronics: embed the question, run a hybrid query against the managed
//! product index, and ground a hosted chat model's answer on the retrieved
//! passages.
//!
//! The pipeline is strictly linear per turn (embed → retrieve → respond) and
//! every external collaborator sits behind a trait seam: [`EmbeddingProvider`],
//! [`Retriever`], [`ChatModel`], and [`credential::TokenProvider`].

pub mod chat;
pub mod config;
pub mod credential;
pub mod embedding;
pub mod error;
pub mod eval;
pub mod indexer;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod seed;
pub mod server;

pub use chat::{ChatModel, Completion, Message, Role, SamplingParams, TokenUsage};
pub use config::AppConfig;
pub use embedding::EmbeddingProvider;
pub use error::{ChatError, Result};
pub use pipeline::{ChatOutcome, RagPipeline};
pub use retriever::{Category, Passage, Retrieval, Retriever};
pub use server::{AppState, app_router, run_server};
