// ============================================================
// Layer 1 — HTTP Handlers
// ============================================================
// Request bodies are parsed by hand from raw bytes, not through
// the `Json` extractor, so every malformed body (bad JSON, wrong
// key, wrong element type) gets the same 400 response and the
// model is never called for it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;

pub const SERVICE_NAME: &str = "sentiment-api";
pub const INVALID_BODY: &str = "Request body must be JSON with key 'texts': List[str].";

/// What a valid /predict body asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictRequest {
    /// `{"texts": [...]}`, answered with `{"predictions": [...]}`
    Batch(Vec<String>),
    /// `{"text": "..."}`, answered with `{"prediction": n}`
    Single(String),
}

impl PredictRequest {
    /// Validate a raw body. `None` means the body is unusable.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object()?;

        if let Some(texts) = object.get("texts") {
            return texts
                .as_array()?
                .iter()
                .map(|t| t.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(PredictRequest::Batch);
        }

        object
            .get("text")
            .and_then(Value::as_str)
            .map(|t| PredictRequest::Single(t.to_string()))
    }

    fn into_texts(self) -> Vec<String> {
        match self {
            PredictRequest::Batch(texts) => texts,
            PredictRequest::Single(text) => vec![text],
        }
    }
}

pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "endpoints": {
            "health": "/health",
            "predict": "/predict",
        }
    }))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn predict_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(request) = PredictRequest::parse(&body) else {
        tracing::debug!("Rejected /predict body ({} bytes)", body.len());
        return error_response(StatusCode::BAD_REQUEST, INVALID_BODY);
    };

    let single    = matches!(request, PredictRequest::Single(_));
    let texts     = request.into_texts();
    let predictor = Arc::clone(&state.predictor);

    // Featurization + scoring is CPU-bound; keep it off the reactor
    let result = tokio::task::spawn_blocking(move || predictor.predict(&texts)).await;

    match result {
        Ok(Ok(predictions)) if single => match predictions.first() {
            Some(p) => Json(json!({ "prediction": p })).into_response(),
            None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "model returned no prediction"),
        },
        Ok(Ok(predictions)) => Json(json!({ "predictions": predictions })).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Prediction failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"))
        }
        Err(e) => {
            tracing::error!(error = %e, "Prediction task panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "prediction task failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
