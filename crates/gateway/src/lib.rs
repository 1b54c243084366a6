//! HTTP API gateway for QueryDeck.
//!
//! Exposes the session/prompt API over the retrieval pipeline:
//!
//! - `GET  /health`                                — liveness probe
//! - `POST /session/select-document/{document_id}` — select + initialize
//! - `GET  /session/current-context`               — combined context
//! - `POST /prompt/ask`                            — retrieval turn
//! - `POST /prompt/generate`                       — assembled prompt
//! - `POST /prompt/llm-response`                   — grounded answer
//!
//! Handlers are thin: all policy lives in the engine; this layer only
//! maps typed errors to status codes. Built on Axum.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use querydeck_config::AppConfig;
use querydeck_core::error::Error;
use querydeck_core::{ChunkStore, Embedder, Generator, RetrievedPassage, Summarizer};
use querydeck_engine::{ContextAccumulator, RetrievalPipeline, VectorRetriever};

/// Shared application state for the gateway.
pub struct AppState {
    pub pipeline: RetrievalPipeline,
    pub default_top_k: usize,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/session/select-document/{document_id}",
            post(select_document_handler),
        )
        .route("/session/current-context", get(current_context_handler))
        .route("/prompt/ask", post(ask_handler))
        .route("/prompt/generate", post(generate_prompt_handler))
        .route("/prompt/llm-response", post(llm_response_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MiB body limit
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the collaborator clients, the chunk store, and the pipeline
/// once, then serves until shutdown.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let api_key = config
        .gemini
        .api_key
        .clone()
        .ok_or("No Gemini API key configured — set GEMINI_API_KEY")?;

    // One sidecar client serves as both embedder and summarizer.
    let sidecar = Arc::new(querydeck_clients::SidecarClient::new(
        &config.sidecar.base_url,
    ));
    let index = Arc::new(querydeck_clients::QdrantHttpIndex::new(&config.qdrant.url));
    let generator: Arc<dyn Generator> = Arc::new(querydeck_clients::GeminiGenerator::new(
        api_key,
        &config.gemini.api_url,
    ));

    let chunk_store: Arc<dyn ChunkStore> = match config.store.backend.as_str() {
        "postgres" => {
            let database_url = config
                .store
                .database_url
                .clone()
                .ok_or("store.backend = \"postgres\" requires a database URL")?;
            let store = querydeck_store::PostgresChunkStore::connect(&database_url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        _ => Arc::new(querydeck_store::InMemoryChunkStore::new()),
    };

    let embedder: Arc<dyn Embedder> = sidecar.clone();
    let summarizer: Arc<dyn Summarizer> = sidecar;

    let retriever = VectorRetriever::new(embedder, index, config.qdrant.collection.clone());
    let accumulator = ContextAccumulator::new(summarizer, chunk_store.clone());
    let pipeline = RetrievalPipeline::new(retriever, chunk_store, accumulator, generator);

    let state = Arc::new(AppState {
        pipeline,
        default_top_k: config.retrieval.default_top_k,
    });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct AskRequest {
    query_text: String,
    /// Number of passages to retrieve; the configured default when omitted.
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct AskResponse {
    passages: Vec<RetrievedPassage>,
}

#[derive(Deserialize)]
struct PromptRequest {
    prompt_text: String,
}

#[derive(Serialize)]
struct PromptResponse {
    response: String,
}

#[derive(Serialize)]
struct AnswerResponse {
    llm_response: String,
}

#[derive(Serialize)]
struct SelectDocumentResponse {
    status: String,
    active_document: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

/// Map the typed error taxonomy onto HTTP status codes.
fn error_response(err: Error) -> HandlerError {
    let status = match &err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        Error::NoContextAvailable => StatusCode::CONFLICT,
        Error::Embedding(_)
        | Error::Index(_)
        | Error::Summarization(_)
        | Error::Generation(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(status = %status, "request failed: {err}");
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn select_document_handler(
    State(state): State<SharedState>,
    Path(document_id): Path<String>,
) -> Result<Json<SelectDocumentResponse>, HandlerError> {
    state
        .pipeline
        .select_document(&document_id)
        .await
        .map_err(error_response)?;

    Ok(Json(SelectDocumentResponse {
        status: "success".into(),
        active_document: document_id,
        message: "Document selected and context initialized".into(),
    }))
}

async fn current_context_handler(State(state): State<SharedState>) -> String {
    state.pipeline.current_context().await
}

async fn ask_handler(
    State(state): State<SharedState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, HandlerError> {
    let top_k = request.limit.unwrap_or(state.default_top_k);
    let passages = state
        .pipeline
        .ask(&request.query_text, top_k)
        .await
        .map_err(error_response)?;

    Ok(Json(AskResponse { passages }))
}

async fn generate_prompt_handler(
    State(state): State<SharedState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, HandlerError> {
    let response = state
        .pipeline
        .generate_prompt(&request.prompt_text)
        .await
        .map_err(error_response)?;

    Ok(Json(PromptResponse { response }))
}

async fn llm_response_handler(
    State(state): State<SharedState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerResponse>, HandlerError> {
    let top_k = request.limit.unwrap_or(state.default_top_k);
    let llm_response = state
        .pipeline
        .answer(&request.query_text, top_k)
        .await
        .map_err(error_response)?;

    Ok(Json(AnswerResponse { llm_response }))
}

// ── Tests ─────────────────────────────────────────────────────────────────
