//! HTTP surface: the chat endpoint plus health and config reporting.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::chat::Message;
use crate::error::ChatError;
use crate::pipeline::{ChatOutcome, RagPipeline};

/// Shared server state: the pipeline and its configuration.
#[derive(Clone)]
pub struct AppState {
    /// The RAG pipeline serving chat turns.
    pub pipeline: Arc<RagPipeline>,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's message. Required; its absence is a validation error, not
    /// a deserialization failure.
    #[serde(default)]
    pub message: Option<String>,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<Message>,
    /// Whether to ground the answer with retrieval. Defaults to true.
    #[serde(default = "default_use_rag")]
    pub use_rag: bool,
}

fn default_use_rag() -> bool {
    true
}

/// Error envelope returned for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// A description of the failure.
    pub error: String,
}

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .route("/api/config", get(config_info))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the chat API.
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let config = state.pipeline.config().clone();
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for walle-rag server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("walle-rag listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatOutcome>, (StatusCode, Json<ErrorBody>)> {
    let message = request.message.as_deref().unwrap_or("");

    let outcome = state
        .pipeline
        .answer(message, &request.history, request.use_rag)
        .await
        .map_err(error_response)?;

    Ok(Json(outcome))
}

/// Map pipeline errors onto the wire contract: validation failures are 400s,
/// every upstream failure is one opaque 500 carrying the error text.
fn error_response(error: ChatError) -> (StatusCode, Json<ErrorBody>) {
    let status = match error {
        ChatError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody { error: error.to_string() }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.pipeline.config();
    Json(json!({
        "status": "healthy",
        "service": "walle-rag",
        "auth": "bearer (managed identity / env token)",
        "connections": {
            "openai": {
                "endpoint": config.openai_endpoint,
                "chat_model": config.chat_deployment,
                "embedding_model": config.embedding_deployment,
            },
            "search": {
                "endpoint": config.search_endpoint,
                "index": config.index_name,
            },
        },
    }))
}

async fn config_info(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.pipeline.config();
    Json(json!({
        "openai_endpoint": config.openai_endpoint,
        "search_endpoint": config.search_endpoint,
        "chat_model": config.chat_deployment,
        "embedding_model": config.embedding_deployment,
        "search_index": config.index_name,
        "top_k": config.top_k,
        "history_window": config.history_window,
    }))
}
