//! HTTP surface of the service.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`handlers::root`] |
//! | `GET /api/health` | [`handlers::health_check`] |
//! | `POST /api/classify` | [`handlers::classify_single`] |
//! | `POST /api/classify/batch` | [`handlers::classify_batch`] |
//! | `GET /api/model/info` | [`handlers::model_info`] (Basic auth) |

mod auth;
mod error;
pub mod handlers;
mod schema;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;

use crate::classifier::InferenceEngine;

pub use auth::AdminCredentials;
pub use error::ApiError;
pub use schema::{BatchQueryRequest, HealthStatus, SingleQueryRequest};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub credentials: Arc<AdminCredentials>,
    pub inference_timeout: Duration,
}

impl AppState {
    pub fn new(engine: Arc<InferenceEngine>, credentials: AdminCredentials, inference_timeout: Duration) -> Self {
        Self {
            engine,
            credentials: Arc::new(credentials),
            inference_timeout,
        }
    }
}

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/classify", post(handlers::classify_single))
        .route("/classify/batch", post(handlers::classify_batch))
        .route("/model/info", get(handlers::model_info));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .with_state(state)
}
