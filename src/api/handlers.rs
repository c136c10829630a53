//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::api::types::MessageResponse;
use crate::api::types::OptimizeRequest;
use crate::api::types::OptimizeResponse;
use crate::api::types::SimulateRequest;
use crate::api::types::SimulateResponse;
use crate::llm::LlmService;
use crate::metrics::calculate_metrics;
use crate::retrieval::Retriever;
use crate::retrieval::DEFAULT_TOP_K;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<Retriever>,
    pub llm: Arc<LlmService>,
}

/// Service banner (GET /)
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "PromptRAG API is running.".to_string(),
    })
}

/// Health check handler (GET /health)
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let indexed_prompts = state.retriever.snapshot().map_or(0, |s| s.len());
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        index_loaded: state.retriever.is_ready(),
        indexed_prompts,
    }))
}

/// Rewrite a prompt and fetch similar exemplars (POST /optimize)
///
/// Returns the response body bare, not in the [`ApiResponse`] envelope;
/// clients read `optimized_prompt` and friends off the top level.
pub async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, StatusCode> {
    info!("POST /optimize");

    let original_metrics = calculate_metrics(&req.prompt);

    let optimized_prompt = match state.llm.optimize(&req.prompt, req.model.as_deref()).await {
        Ok(text) => text,
        Err(e) => {
            error!("Prompt optimization failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let optimized_metrics = calculate_metrics(&optimized_prompt);

    // Exemplar lookup never fails the request; it degrades to an empty list
    let similar_prompts = state
        .retriever
        .retrieve_similar(&req.prompt, DEFAULT_TOP_K)
        .await;

    Ok(Json(OptimizeResponse {
        original_prompt: req.prompt,
        optimized_prompt,
        original_metrics,
        optimized_metrics,
        similar_prompts,
    }))
}

/// Run original and optimized prompts side by side (POST /simulate)
///
/// Like [`optimize`], responds with the bare body.
pub async fn simulate(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, StatusCode> {
    info!("POST /simulate");

    let model = req.model.as_deref();
    match tokio::try_join!(
        state.llm.complete(&req.original_prompt, model),
        state.llm.complete(&req.optimized_prompt, model),
    ) {
        Ok((original_output, optimized_output)) => Ok(Json(SimulateResponse {
            original_output,
            optimized_output,
        })),
        Err(e) => {
            error!("Prompt simulation failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
