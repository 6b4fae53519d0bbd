//! HTTP routes for the categorization service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use super::handler::{
    BatchRequest, BatchResponse, CategorizationService, CategorizeRequest, CategorizeResponse,
};
use crate::error::{PredictionError, ServiceError};

/// Shared state for the categorizer routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CategorizationService>,
}

/// Build the Axum router.
pub fn categorizer_routes(service: Arc<CategorizationService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(health))
        .route("/v1/categorize", post(categorize))
        .route("/v1/categorize/batch", post(categorize_batch))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.service.engine();
    Json(serde_json::json!({
        "status": "ok",
        "service": "email-categorizer",
        "model_version": engine.version(),
        "categories": engine.labels(),
    }))
}

// ── Categorize ──────────────────────────────────────────────────────

/// POST /v1/categorize
///
/// On failure responds 500 with the error text and an empty response.
async fn categorize(
    State(state): State<AppState>,
    Json(request): Json<CategorizeRequest>,
) -> Response {
    let id = request.id.clone();
    match state.service.categorize(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!(email_id = %id, error = %e, "Prediction failed");
            prediction_failure(&e)
        }
    }
}

/// 500 with the error text and an all-default response.
fn prediction_failure(error: &PredictionError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": format!("Error during prediction: {error}"),
            "response": CategorizeResponse::default(),
        })),
    )
        .into_response()
}

/// POST /v1/categorize/batch
async fn categorize_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Response {
    match state.service.categorize_batch(request.emails).await {
        Ok(results) => Json(BatchResponse { results }).into_response(),
        Err(e) => {
            let status = match e {
                ServiceError::BatchTooLarge { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}
