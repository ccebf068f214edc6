use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use log::{debug, error};
use serde_json::{json, Value};

use super::auth::AdminUser;
use super::error::ApiError;
use super::schema::{BatchQueryRequest, HealthStatus, SingleQueryRequest, ValidatedJson};
use super::AppState;
use crate::classifier::{BatchPrediction, EngineError, InferenceEngine, Prediction};
use crate::metadata::ModelInfo;

const NOT_READY: &str = "ML model is not loaded and ready for inference.";

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Intent Classification API is running." }))
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    let status = HealthStatus {
        api_status: "ok",
        model_loaded: state.engine.is_ready(),
    };
    if !status.model_loaded {
        return Err(ApiError::Unhealthy(status));
    }
    Ok(Json(status))
}

/// `POST /api/classify`
pub async fn classify_single(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SingleQueryRequest>,
) -> Result<Json<Prediction>, ApiError> {
    if !state.engine.is_ready() {
        return Err(ApiError::NotReady(NOT_READY));
    }

    let text = request.text;
    let prediction = run_inference(&state, move |engine| engine.classify_single(&text))
        .await
        .map_err(|e| internal("Classification", e))?;
    Ok(Json(prediction))
}

/// `POST /api/classify/batch`
pub async fn classify_batch(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BatchQueryRequest>,
) -> Result<Json<Vec<BatchPrediction>>, ApiError> {
    if !state.engine.is_ready() {
        return Err(ApiError::NotReady(NOT_READY));
    }
    if request.texts.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let texts = request.texts;
    debug!("Batch request with {} texts", texts.len());
    let predictions = run_inference(&state, move |engine| engine.classify_batch(&texts))
        .await
        .map_err(|e| internal("Batch classification", e))?;
    Ok(Json(predictions))
}

/// `GET /api/model/info`, Basic auth required.
pub async fn model_info(
    AdminUser(_user): AdminUser,
    State(state): State<AppState>,
) -> Result<Json<ModelInfo>, ApiError> {
    let labels = state
        .engine
        .labels()
        .ok_or(ApiError::NotReady("Model is not loaded. Cannot retrieve metadata."))?;
    Ok(Json(ModelInfo::for_labels(labels)))
}

/// Runs a prediction on the blocking pool, bounded by the configured timeout.
///
/// A timeout or a panicked worker is reported as `InferenceFailure`.
async fn run_inference<T, F>(state: &AppState, predict: F) -> Result<T, EngineError>
where
    F: FnOnce(&InferenceEngine) -> Result<T, EngineError> + Send + 'static,
    T: Send + 'static,
{
    let engine = Arc::clone(&state.engine);
    let task = tokio::task::spawn_blocking(move || predict(&engine));

    match tokio::time::timeout(state.inference_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(EngineError::InferenceFailure(format!(
            "prediction worker failed: {}",
            join_error
        ))),
        Err(_) => Err(EngineError::InferenceFailure(format!(
            "prediction timed out after {:?}",
            state.inference_timeout
        ))),
    }
}

fn internal(operation: &str, err: EngineError) -> ApiError {
    match err {
        // The engine can still refuse if a caller skipped the readiness check.
        EngineError::NotReady => ApiError::NotReady(NOT_READY),
        other => {
            error!("{} failed: {}", operation, other);
            ApiError::Internal(format!("{} failed due to an internal error: {}", operation, other))
        }
    }
}
