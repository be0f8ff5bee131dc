//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for rebuilding the index, search, and grounded
//! questions over the transcript library.

use crate::chunking::Chunk;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::ReelError;
use crate::orchestrator::{IndexStats, Orchestrator};
use crate::rag::Citation;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    // Serve even if the first build fails; /rebuild can retry it.
    let spinner = Output::spinner("Building initial index...");
    match orchestrator.rebuild_index().await {
        Ok(stats) => {
            spinner.finish_and_clear();
            Output::index_stats(&stats);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::warning(&format!(
                "Initial index build failed at the {} stage: {}",
                e.stage(),
                e
            ));
        }
    }

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/rebuild", post(rebuild))
        .route("/search", post(search))
        .route("/ask", post(ask))
        .route("/documents", get(list_documents))
        .route("/documents/{video_id}", get(get_document))
        .route("/documents/{video_id}/summary", post(summarize))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Reel API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Rebuild", "POST /rebuild");
    Output::kv("Search", "POST /search");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("List Videos", "GET  /documents");
    Output::kv("Get Video", "GET  /documents/:video_id");
    Output::kv("Summarize", "POST /documents/:video_id/summary");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Errors ===

/// A pipeline error rendered as `{ error, stage }`.
struct ApiError(ReelError);

impl From<ReelError> for ApiError {
    fn from(err: ReelError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    stage: &'static str,
}

fn status_for(err: &ReelError) -> StatusCode {
    match err {
        ReelError::IndexNotBuilt => StatusCode::CONFLICT,
        ReelError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        ReelError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ReelError::EmptyCorpus => StatusCode::UNPROCESSABLE_ENTITY,
        ReelError::Embedding(_) | ReelError::EmbeddingRejected(_) | ReelError::Generation(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::warn!("Request failed at the {} stage: {}", self.0.stage(), self.0);
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
            stage: self.0.stage(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// === Request/Response Types ===

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<Citation>,
    fallback: bool,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<Citation>,
    fallback: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<IndexStats>,
}

#[derive(Serialize)]
struct DocumentListResponse {
    documents: Vec<DocumentInfo>,
    total: usize,
}

#[derive(Serialize)]
struct DocumentInfo {
    video_id: String,
    title: String,
    chunk_count: usize,
    last_timestamp: u64,
}

#[derive(Serialize)]
struct DocumentDetailResponse {
    video_id: String,
    title: String,
    chunk_count: usize,
    chunks: Vec<ChunkInfo>,
}

#[derive(Serialize)]
struct ChunkInfo {
    start: u64,
    end: u64,
    timestamp: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl ChunkInfo {
    fn from_chunk(chunk: &Chunk, playback_base_url: &str) -> Self {
        Self {
            start: chunk.start,
            end: chunk.end,
            timestamp: chunk.format_timestamp(),
            text: chunk.text.clone(),
            url: chunk.playback_url(playback_base_url),
        }
    }
}

#[derive(Serialize)]
struct SummaryResponse {
    video_id: String,
    summary: String,
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let index = state.orchestrator.stats();
    Json(HealthResponse {
        status: if index.is_some() { "ok" } else { "empty" },
        index,
    })
}

async fn rebuild(State(state): State<Arc<AppState>>) -> ApiResult<IndexStats> {
    Ok(Json(state.orchestrator.rebuild_index().await?))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let (results, fallback) = state
        .orchestrator
        .search_citations(&req.query, req.top_k, req.video_id.as_deref())
        .await?;
    Ok(Json(SearchResponse { results, fallback }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    let response = state
        .orchestrator
        .ask(&req.question, req.top_k, req.video_id.as_deref())
        .await?;
    Ok(Json(AskResponse {
        answer: response.answer,
        sources: response.sources,
        fallback: response.fallback,
    }))
}

async fn list_documents(State(state): State<Arc<AppState>>) -> ApiResult<DocumentListResponse> {
    // Same generation as /documents/{video_id}; read the source only before the first build.
    let overview = match state.orchestrator.documents() {
        Some(documents) => documents,
        None => state.orchestrator.overview().await?,
    };
    Ok(Json(DocumentListResponse {
        total: overview.len(),
        documents: overview
            .into_iter()
            .map(|d| DocumentInfo {
                video_id: d.document_id,
                title: d.title,
                chunk_count: d.chunk_count,
                last_timestamp: d.last_timestamp,
            })
            .collect(),
    }))
}

async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> ApiResult<DocumentDetailResponse> {
    let kb = state
        .orchestrator
        .knowledge_base()
        .ok_or(ReelError::IndexNotBuilt)?;
    let document = kb
        .document(&video_id)
        .ok_or_else(|| ReelError::DocumentNotFound(video_id.clone()))?;

    let base_url = &state.orchestrator.settings().source.playback_base_url;
    let chunks: Vec<ChunkInfo> = kb
        .index
        .chunks_for_document(&video_id)
        .map(|c| ChunkInfo::from_chunk(c, base_url))
        .collect();

    Ok(Json(DocumentDetailResponse {
        video_id: document.document_id.clone(),
        title: document.title.clone(),
        chunk_count: chunks.len(),
        chunks,
    }))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> ApiResult<SummaryResponse> {
    let summary = state.orchestrator.summarize(&video_id).await?;
    Ok(Json(SummaryResponse { video_id, summary }))
}
