//! JSON gateway server built on axum.

use super::GatewayConfig;
use crate::error::GatewayError;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    routing::{get, post},
};
use modelhub_ml::training::round_to;
use modelhub_ml::{MlResult, ModelService, PredictRequest, ProcessRequest, TrainRequest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState {
    service: ModelService,
    config: GatewayConfig,
    started_at: Instant,
}

/// Thread-safe shared state reference for axum handlers.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(service: ModelService, config: GatewayConfig) -> Self {
        Self {
            service,
            config,
            started_at: Instant::now(),
        }
    }

    pub fn shared(service: ModelService, config: GatewayConfig) -> SharedState {
        Arc::new(Self::new(service, config))
    }

    pub fn service(&self) -> &ModelService {
        &self.service
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Build the axum router with all routes and middleware.
pub fn router(state: SharedState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .route("/health", get(health_handler))
        .route("/models", get(list_models_handler))
        .route("/train", post(train_handler))
        .route("/predict", post(predict_handler))
        .route("/process", post(process_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Run a model operation on the blocking thread pool.
async fn run_blocking<T, F>(f: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> MlResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

fn seconds(duration_secs: f64) -> f64 {
    round_to(duration_secs, 3)
}

async fn health_handler(State(state): State<SharedState>) -> Json<Value> {
    let health = state.service.health();
    Json(json!({
        "status": health.status,
        "service": health.service,
        "models": state.service.registry().len(),
        "uptime_secs": state.uptime_secs(),
    }))
}

async fn list_models_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "models": state.service.list_models() }))
}

async fn train_handler(
    State(state): State<SharedState>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> Result<Json<Value>, GatewayError> {
    let Json(request) = payload?;
    let outcome = run_blocking(move || state.service.train(&request)).await?;

    Ok(Json(json!({
        "model_name": outcome.model_name,
        "accuracy": outcome.accuracy,
        "stats": {
            "training_samples": outcome.training_samples,
            "features_used": outcome.features_used.len(),
            "duration_seconds": seconds(outcome.duration_secs),
        },
        "status": "success",
    })))
}

async fn predict_handler(
    State(state): State<SharedState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Value>, GatewayError> {
    let Json(request) = payload?;
    let outcome = run_blocking(move || state.service.predict(&request)).await?;

    Ok(Json(json!({
        "predictions": outcome.predictions,
        "model_name": outcome.model_name,
        "stats": {
            "input_samples": outcome.input_samples,
            "duration_seconds": seconds(outcome.duration_secs),
        },
        "status": "success",
    })))
}

async fn process_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<Value>, GatewayError> {
    let Json(request) = payload?;
    let outcome = run_blocking(move || state.service.process(&request)).await?;

    Ok(Json(json!({
        "processed_data": outcome.processed_data,
        "stats": {
            "input_records": outcome.input_records,
            "output_records": outcome.output_records,
            "duration_seconds": seconds(outcome.duration_secs),
            "operation": outcome.operation,
        },
        "status": "success",
    })))
}

/// Start the gateway on the configured address.
///
/// Runs until ctrl-c, then drains in-flight requests before returning.
pub async fn run(state: SharedState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_addr();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Model service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Model service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for ctrl-c; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
