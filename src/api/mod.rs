// ============================================================
// Layer 1 — HTTP Presentation Layer
// ============================================================
// The prediction service. Like the CLI, this layer only routes:
// request validation lives here, prediction is delegated to the
// process-wide Predictor loaded at startup.
//
//   GET  /         → service descriptor
//   GET  /health   → {"status":"ok"}
//   POST /predict  → {"texts":[...]} → {"predictions":[...]}
//                    {"text":"..."}  → {"prediction":n}

pub mod routes;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::domain::traits::Predictor;
use routes::{health_handler, index_handler, predict_handler};

/// Shared state threaded through axum handlers via `State`.
/// Immutable for the lifetime of the process.
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>) -> Arc<Self> {
        Arc::new(Self { predictor })
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Sentiment API listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sentiment API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
