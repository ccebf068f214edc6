use ort::Error as OrtError;
use std::path::PathBuf;

/// Represents the different types of errors that can occur in the inference engine.
///
/// `ArtifactNotFound` and `ArtifactInvalid` are load-time failures: the engine stays
/// unloaded and every later prediction is answered with `NotReady`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// A required artifact file is missing from the artifacts directory
    #[error("Required model file not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    /// An artifact exists but could not be read, parsed or reconciled with its pair
    #[error("Invalid model artifact: {0}")]
    ArtifactInvalid(String),
    /// A prediction was requested before the artifacts were loaded
    #[error("ML model is not loaded and ready for inference")]
    NotReady,
    /// Normalization or prediction failed unexpectedly
    #[error("Inference failed: {0}")]
    InferenceFailure(String),
}

impl EngineError {
    /// True for the failures `load()` can report.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ArtifactNotFound(_) | Self::ArtifactInvalid(_))
    }
}

impl From<OrtError> for EngineError {
    fn from(err: OrtError) -> Self {
        EngineError::InferenceFailure(err.to_string())
    }
}
