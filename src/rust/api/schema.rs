use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Body of `POST /api/classify`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SingleQueryRequest {
    pub text: String,
}

/// Body of `POST /api/classify/batch`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchQueryRequest {
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub api_status: &'static str,
    pub model_loaded: bool,
}

/// JSON body extractor that reports every rejection as a 422 `ApiError`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
