//! An HTTP inference service for a pre-trained text intent classifier.
//!
//! The [`InferenceEngine`] owns the classifier and its label space. It starts
//! unloaded, reads its artifacts once, and then answers single and batch
//! predictions concurrently without locking.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use intent_service::InferenceEngine;
//!
//! let engine = InferenceEngine::from_dir("ml");
//! engine.load()?;
//!
//! let prediction = engine.classify_single("Send an email to HR")?;
//! println!("Predicted intent: {}", prediction.intent);
//!
//! for result in engine.classify_batch(&["Find the nearest coffee shop", "hello there"])? {
//!     println!("{} -> {} ({:.2})", result.text, result.intent, result.confidence);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! ```no_run
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! use intent_service::{api, AdminCredentials, AppState, InferenceEngine};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let engine = Arc::new(InferenceEngine::from_dir("ml"));
//! let _ = engine.load();
//!
//! let state = AppState::new(engine, AdminCredentials::new("admin", "secret"), Duration::from_secs(5));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, api::router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod classifier;
pub mod config;
pub mod metadata;
mod runtime;

pub use api::{AdminCredentials, ApiError, AppState};
pub use classifier::{
    normalize, ArtifactSource, Artifacts, BatchPrediction, DirArtifactSource, EngineError, InferenceEngine,
    IntentModel, LabelSpace, Prediction,
};
pub use config::ServiceConfig;
pub use metadata::ModelInfo;
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
