use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::schema::HealthStatus;

/// Failures surfaced to HTTP clients, each with a fixed status code.
///
/// Every variant renders as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body (422)
    #[error("{0}")]
    Validation(String),
    /// Engine has no artifacts loaded (503)
    #[error("{0}")]
    NotReady(&'static str),
    /// Health check while degraded (503, detail carries the status fields)
    #[error("ML model not loaded.")]
    Unhealthy(HealthStatus),
    /// Unexpected failure during inference (500)
    #[error("{0}")]
    Internal(String),
    /// Missing or wrong Basic credentials (401 with challenge)
    #[error("Incorrect username or password")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotReady(_) | Self::Unhealthy(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Unhealthy(health) => json!({
                "error": self.to_string(),
                "api_status": health.api_status,
                "model_loaded": health.model_loaded,
            }),
            other => json!(other.to_string()),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if matches!(self, Self::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}
