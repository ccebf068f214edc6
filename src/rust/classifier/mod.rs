mod artifacts;
mod engine;
mod error;
mod labels;
mod model;
mod normalize;

pub use artifacts::{ArtifactSource, Artifacts, DirArtifactSource, LABELS_FILE, MODEL_FILE};
pub use engine::{BatchPrediction, InferenceEngine, Prediction};
pub use error::EngineError;
pub use labels::LabelSpace;
pub use model::{IntentModel, OnnxIntentModel, DEFAULT_PROBABILITY_OUTPUT};
pub use normalize::normalize;
