use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::{
    error::ServiceError,
    model::{
        FeatureVector, LoadResponse, ModelRegistry, ModelStatus, PredictRequest, PredictResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

pub fn build_router(registry: Arc<ModelRegistry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/health", get(health))
        .route("/load_model", get(load_model))
        .route("/predict", post(predict))
        .route("/model", get(model_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> &'static str {
    "ok"
}

async fn load_model(State(state): State<AppState>) -> Result<Json<LoadResponse>, ServiceError> {
    state.registry.reload().await?;
    Ok(Json(LoadResponse {
        message: "Model loaded successfully",
    }))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ServiceError> {
    let Json(request) =
        payload.map_err(|rejection| ServiceError::InvalidInput(rejection.body_text()))?;
    let features = FeatureVector::try_from(request)?;
    debug!(?features, "running prediction");

    let impression = state.registry.predict(features).await?;
    Ok(Json(PredictResponse { impression }))
}

async fn model_status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.registry.status())
}
