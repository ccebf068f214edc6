use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use log::{debug, info};
use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use super::artifacts::{ArtifactSource, Artifacts, DirArtifactSource};
use super::error::EngineError;
use super::labels::LabelSpace;
use super::normalize::normalize;

/// Probabilities this far outside `[0, 1]` are treated as rounding noise and clamped.
const PROBABILITY_TOLERANCE: f32 = 1e-5;

/// The outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub intent: String,
    pub confidence: f32,
}

/// The outcome for one entry of a batch, echoing the caller's original text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub text: String,
    pub intent: String,
    pub confidence: f32,
}

/// Owns the classifier artifacts and serves predictions from them.
///
/// The engine starts unloaded. [`load`](Self::load) reads the artifacts once;
/// if that read fails the engine stays unloaded for good. Once loaded it is
/// read-only and every method may be called from any number of threads
/// without locking.
///
/// ```no_run
/// use intent_service::InferenceEngine;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Arc::new(InferenceEngine::from_dir("ml"));
/// engine.load()?;
///
/// let prediction = engine.classify_single("Can you book a meeting next week?")?;
/// println!("{} ({:.2})", prediction.intent, prediction.confidence);
/// # Ok(())
/// # }
/// ```
pub struct InferenceEngine {
    source: Box<dyn ArtifactSource>,
    state: OnceLock<Result<Artifacts, EngineError>>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<InferenceEngine>();
    }
};

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("source", &self.source.describe())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl InferenceEngine {
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            state: OnceLock::new(),
        }
    }

    /// Creates an engine reading the default artifact file names from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(DirArtifactSource::new(dir))
    }

    /// Reads and validates the artifacts, making the engine ready.
    ///
    /// Storage is read at most once per engine. Later calls, including
    /// concurrent ones, return the outcome of that first read: `Ok(())` once
    /// ready, or the same error if it failed. A failed engine never becomes ready.
    ///
    /// # Errors
    /// - `ArtifactNotFound` if the model or label encoder is missing
    /// - `ArtifactInvalid` if either cannot be parsed, or the model's output
    ///   width differs from the number of labels
    pub fn load(&self) -> Result<(), EngineError> {
        self.state
            .get_or_init(|| self.read_artifacts())
            .as_ref()
            .map(|_| ())
            .map_err(Clone::clone)
    }

    fn read_artifacts(&self) -> Result<Artifacts, EngineError> {
        let start = Instant::now();
        info!("Loading ML model artifacts from {}...", self.source.describe());
        let artifacts = self.source.read()?;
        Self::check_dimensions(&artifacts)?;
        info!(
            "Model artifacts loaded successfully: {} intents in {:.2?}",
            artifacts.labels.len(),
            start.elapsed()
        );
        Ok(artifacts)
    }

    /// Runs one sample prediction on an empty text and checks the output width against the label space.
    fn check_dimensions(artifacts: &Artifacts) -> Result<(), EngineError> {
        let sample = artifacts
            .model
            .predict_proba(&[String::new()])
            .map_err(|e| EngineError::ArtifactInvalid(format!("Sample prediction failed: {}", e)))?;
        let expected = (1, artifacts.labels.len());
        if sample.dim() != expected {
            return Err(EngineError::ArtifactInvalid(format!(
                "Model output shape {:?} does not match label encoder with {} classes",
                sample.dim(),
                artifacts.labels.len()
            )));
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.loaded().is_ok()
    }

    /// The loaded label space, or `None` before a successful load.
    pub fn labels(&self) -> Option<&LabelSpace> {
        self.loaded().ok().map(|artifacts| &artifacts.labels)
    }

    fn loaded(&self) -> Result<&Artifacts, EngineError> {
        match self.state.get() {
            Some(Ok(artifacts)) => Ok(artifacts),
            _ => Err(EngineError::NotReady),
        }
    }

    /// Predicts the intent of a single text.
    ///
    /// # Errors
    /// - `NotReady` if the engine has not been loaded
    /// - `InferenceFailure` if the model fails or returns an invalid distribution
    pub fn classify_single(&self, text: &str) -> Result<Prediction, EngineError> {
        let artifacts = self.loaded()?;
        let normalized = [normalize(text)];
        let probabilities = artifacts.model.predict_proba(&normalized)?;
        let mut picks = Self::pick_intents(&probabilities, 1, &artifacts.labels)?;
        let (intent, confidence) = picks
            .pop()
            .ok_or_else(|| EngineError::InferenceFailure("Model returned no prediction".into()))?;
        debug!("Classified {:?} as {} ({:.4})", normalized[0], intent, confidence);
        Ok(Prediction { intent, confidence })
    }

    /// Predicts the intent of every text with a single model invocation.
    ///
    /// Results keep the input order and carry the original, non-normalized text.
    /// An empty batch returns an empty vector without calling the model.
    pub fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<BatchPrediction>, EngineError> {
        let artifacts = self.loaded()?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let normalized: Vec<String> = texts.iter().map(|t| normalize(t.as_ref())).collect();
        let probabilities = artifacts.model.predict_proba(&normalized)?;
        let picks = Self::pick_intents(&probabilities, texts.len(), &artifacts.labels)?;
        debug!("Classified batch of {} texts", texts.len());

        Ok(texts
            .iter()
            .zip(picks)
            .map(|(text, (intent, confidence))| BatchPrediction {
                text: text.as_ref().to_string(),
                intent,
                confidence,
            })
            .collect())
    }

    /// Maps each row of the probability matrix to its best label.
    fn pick_intents(
        probabilities: &Array2<f32>,
        expected_rows: usize,
        labels: &LabelSpace,
    ) -> Result<Vec<(String, f32)>, EngineError> {
        let (rows, cols) = probabilities.dim();
        if rows != expected_rows || cols != labels.len() {
            return Err(EngineError::InferenceFailure(format!(
                "Model returned shape ({}, {}), expected ({}, {})",
                rows,
                cols,
                expected_rows,
                labels.len()
            )));
        }

        probabilities
            .rows()
            .into_iter()
            .map(|row| -> Result<(String, f32), EngineError> {
                let (index, confidence) = argmax(row)?;
                let intent = labels.get(index).ok_or_else(|| {
                    EngineError::InferenceFailure(format!("No label for class index {}", index))
                })?;
                Ok((intent.to_string(), confidence))
            })
            .collect()
    }
}

/// Index and value of the largest probability; the first index wins on ties.
pub(crate) fn argmax(row: ArrayView1<f32>) -> Result<(usize, f32), EngineError> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in row.iter().enumerate() {
        if !p.is_finite() || p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
            return Err(EngineError::InferenceFailure(format!(
                "Probability {} at class index {} is not in [0, 1]",
                p, index
            )));
        }
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((index, p)),
        }
    }
    best.map(|(index, p)| (index, p.clamp(0.0, 1.0)))
        .ok_or_else(|| EngineError::InferenceFailure("Model returned an empty probability vector".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::IntentModel;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a fixed row for every input and counts invocations.
    struct FixedModel {
        row: Vec<f32>,
        calls: Arc<AtomicUsize>,
    }

    impl IntentModel for FixedModel {
        fn predict_proba(&self, texts: &[String]) -> Result<Array2<f32>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let data: Vec<f32> = texts.iter().flat_map(|_| self.row.clone()).collect();
            Array2::from_shape_vec((texts.len(), self.row.len()), data)
                .map_err(|e| EngineError::InferenceFailure(e.to_string()))
        }
    }

    struct FixedSource {
        row: Vec<f32>,
        labels: Vec<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl ArtifactSource for FixedSource {
        fn read(&self) -> Result<Artifacts, EngineError> {
            Ok(Artifacts {
                model: Box::new(FixedModel {
                    row: self.row.clone(),
                    calls: Arc::clone(&self.calls),
                }),
                labels: LabelSpace::new(self.labels.clone())?,
            })
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn engine_with(row: Vec<f32>, labels: Vec<&'static str>) -> (InferenceEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = InferenceEngine::new(FixedSource {
            row,
            labels,
            calls: Arc::clone(&calls),
        });
        (engine, calls)
    }

    #[test]
    fn test_argmax_first_maximum_wins() -> Result<(), EngineError> {
        assert_eq!(argmax(array![0.1, 0.6, 0.3].view())?, (1, 0.6));
        assert_eq!(argmax(array![0.4, 0.2, 0.4].view())?, (0, 0.4));
        assert_eq!(argmax(array![0.25, 0.25, 0.25, 0.25].view())?, (0, 0.25));
        Ok(())
    }

    #[test]
    fn test_argmax_rejects_invalid_probabilities() {
        assert!(argmax(array![0.5, f32::NAN].view()).is_err());
        assert!(argmax(array![1.5, 0.0].view()).is_err());
        assert!(argmax(array![-0.2, 0.9].view()).is_err());
        assert!(argmax(Array2::<f32>::zeros((1, 0)).row(0)).is_err());
    }

    #[test]
    fn test_argmax_clamps_rounding_noise() -> Result<(), EngineError> {
        let (index, confidence) = argmax(array![1.000001, 0.0].view())?;
        assert_eq!(index, 0);
        assert_eq!(confidence, 1.0);
        Ok(())
    }

    #[test]
    fn test_tie_resolves_to_first_label() -> Result<(), EngineError> {
        let (engine, _) = engine_with(vec![0.2, 0.4, 0.4], vec!["general_chat", "web_search", "email_send"]);
        engine.load()?;
        let prediction = engine.classify_single("anything")?;
        assert_eq!(prediction.intent, "web_search");
        assert_eq!(prediction.confidence, 0.4);
        Ok(())
    }

    #[test]
    fn test_not_ready_before_load() {
        let (engine, calls) = engine_with(vec![1.0], vec!["general_chat"]);
        assert!(!engine.is_ready());
        assert!(engine.labels().is_none());
        assert!(matches!(engine.classify_single("hi"), Err(EngineError::NotReady)));
        assert!(matches!(engine.classify_batch(&["hi"]), Err(EngineError::NotReady)));
        assert!(matches!(engine.classify_batch::<&str>(&[]), Err(EngineError::NotReady)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dimension_mismatch_fails_load() {
        let (engine, _) = engine_with(vec![0.5, 0.5], vec!["general_chat", "web_search", "email_send"]);
        let err = engine.load().unwrap_err();
        assert!(matches!(err, EngineError::ArtifactInvalid(_)));
        assert!(err.is_load_failure());
        assert!(!engine.is_ready());
    }

    #[test]
    fn test_empty_batch_skips_model() -> Result<(), EngineError> {
        let (engine, calls) = engine_with(vec![0.3, 0.7], vec!["a", "b"]);
        engine.load()?;
        let after_load = calls.load(Ordering::SeqCst);

        assert!(engine.classify_batch::<String>(&[])?.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), after_load);

        engine.classify_batch(&["x", "y", "z"])?;
        assert_eq!(calls.load(Ordering::SeqCst), after_load + 1);
        Ok(())
    }
}
