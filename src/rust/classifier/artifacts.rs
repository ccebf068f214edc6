use std::path::{Path, PathBuf};

use log::info;

use super::error::EngineError;
use super::labels::LabelSpace;
use super::model::{IntentModel, OnnxIntentModel, DEFAULT_PROBABILITY_OUTPUT};
use crate::runtime::RuntimeConfig;

/// File name of the serialized classifier inside the artifacts directory.
pub const MODEL_FILE: &str = "intent_classifier.onnx";
/// File name of the serialized label encoder inside the artifacts directory.
pub const LABELS_FILE: &str = "intent_label_encoder.json";

/// The classifier and its label space, always loaded together.
pub struct Artifacts {
    pub model: Box<dyn IntentModel>,
    pub labels: LabelSpace,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Durable storage holding the trained artifacts.
///
/// `read` performs blocking I/O and is called at most once per successful
/// engine load.
pub trait ArtifactSource: Send + Sync {
    fn read(&self) -> Result<Artifacts, EngineError>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Reads `intent_classifier.onnx` and `intent_label_encoder.json` from one directory.
#[derive(Debug, Clone)]
pub struct DirArtifactSource {
    dir: PathBuf,
    probability_output: String,
    runtime_config: RuntimeConfig,
}

impl DirArtifactSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            probability_output: DEFAULT_PROBABILITY_OUTPUT.to_string(),
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Overrides the name of the ONNX output holding class probabilities.
    pub fn with_probability_output(mut self, name: impl Into<String>) -> Self {
        self.probability_output = name.into();
        self
    }

    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.dir.join(LABELS_FILE)
    }
}

impl ArtifactSource for DirArtifactSource {
    fn read(&self) -> Result<Artifacts, EngineError> {
        let model_path = self.model_path();
        let labels_path = self.labels_path();
        info!("Checking model artifacts:");
        info!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        info!("  Label encoder path: {:?} (exists: {})", labels_path, labels_path.exists());

        // Both files must exist before either is opened.
        for path in [&model_path, &labels_path] {
            if !path.exists() {
                return Err(EngineError::ArtifactNotFound(path.clone()));
            }
        }

        let labels = LabelSpace::from_file(&labels_path)?;
        let model = OnnxIntentModel::load(&model_path, &self.probability_output, &self.runtime_config)?;

        Ok(Artifacts {
            model: Box::new(model),
            labels,
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
