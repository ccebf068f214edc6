use std::collections::HashMap;
use std::path::Path;

use log::info;
use ndarray::{Array2, Ix2};
use ort::session::Session;
use ort::value::Tensor;

use super::error::EngineError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A trained model that maps a batch of normalized texts to class probabilities.
///
/// Implementations receive already-normalized text and must return a matrix of
/// shape `[texts.len(), num_classes]` whose rows are probability distributions.
/// One call is one model invocation; the engine never splits a batch.
pub trait IntentModel: Send + Sync {
    fn predict_proba(&self, texts: &[String]) -> Result<Array2<f32>, EngineError>;
}

/// Default name of the probability output emitted by a scikit-learn classifier
/// exported to ONNX with `zipmap` disabled.
pub const DEFAULT_PROBABILITY_OUTPUT: &str = "output_probability";

/// An ONNX classification pipeline taking one string tensor of shape `[N, 1]`.
///
/// The text-to-features stage (e.g. TF-IDF) lives inside the graph, so no
/// tokenizer is needed on the Rust side.
#[derive(Debug)]
pub struct OnnxIntentModel {
    session: Session,
    input_name: String,
    probability_output: String,
}

impl OnnxIntentModel {
    /// Opens the ONNX graph at `model_path` and checks it exposes the expected input and output.
    pub fn load(
        model_path: &Path,
        probability_output: &str,
        config: &RuntimeConfig,
    ) -> Result<Self, EngineError> {
        if !model_path.exists() {
            return Err(EngineError::ArtifactNotFound(model_path.to_path_buf()));
        }

        let session = create_session_builder(config)
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| {
                EngineError::ArtifactInvalid(format!("Failed to load model {}: {}", model_path.display(), e))
            })?;

        let input_name = Self::validate_model(&session, probability_output)?;
        info!("Model structure validated successfully (input '{}')", input_name);

        Ok(Self {
            session,
            input_name,
            probability_output: probability_output.to_string(),
        })
    }

    /// Returns the name of the graph's text input.
    fn validate_model(session: &Session, probability_output: &str) -> Result<String, EngineError> {
        let inputs = &session.inputs;
        if inputs.len() != 1 {
            return Err(EngineError::ArtifactInvalid(format!(
                "Model must have exactly 1 text input, found {}",
                inputs.len()
            )));
        }

        if !session.outputs.iter().any(|output| output.name == probability_output) {
            let found: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
            return Err(EngineError::ArtifactInvalid(format!(
                "Model has no '{}' output (found {:?})",
                probability_output, found
            )));
        }

        Ok(inputs[0].name.clone())
    }
}

impl IntentModel for OnnxIntentModel {
    fn predict_proba(&self, texts: &[String]) -> Result<Array2<f32>, EngineError> {
        let input_array = Array2::from_shape_vec((texts.len(), 1), texts.to_vec())
            .map_err(|e| EngineError::InferenceFailure(format!("Failed to create input array: {}", e)))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_string_array(input_array)
                .map_err(|e| EngineError::InferenceFailure(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = self.session.run(input_tensors)
            .map_err(|e| EngineError::InferenceFailure(format!("Failed to run model: {}", e)))?;
        let probabilities = outputs[self.probability_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| EngineError::InferenceFailure(format!("Failed to extract output tensor: {}", e)))?;

        probabilities
            .to_owned()
            .into_dimensionality::<Ix2>()
            .map_err(|e| EngineError::InferenceFailure(format!("Unexpected output shape: {}", e)))
    }
}
