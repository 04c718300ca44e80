//! Route table and request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use nodes::{PipelineExecutor, StageSummaries};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ListenerError;

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub description: String,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Clone)]
struct AppState {
    executor: Arc<PipelineExecutor>,
}

/// Builds the router. One executor is shared by every request.
///
/// CORS is permissive: the endpoint is meant to be called from a browser
/// front end served from another origin.
pub fn create_app(executor: Arc<PipelineExecutor>) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health))
        .with_state(AppState { executor })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<StageSummaries>, ListenerError> {
    let run = state
        .executor
        .run(&request.description, &request.language)
        .await?;

    info!(run_id = %run.run_id, "generate request served");
    Ok(Json(StageSummaries::from_run(&run)))
}
