use serde::Serialize;

use crate::classifier::LabelSpace;

pub const MODEL_NAME: &str = "Scikit-learn Logistic Regression Pipeline";
pub const MODEL_VERSION: &str = "1.0.0";
pub const LAST_TRAINED: &str = "2025-09-29";

/// Hyperparameters selected by the offline grid search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperparameters {
    #[serde(rename = "classifier__C")]
    pub classifier_c: u32,
    #[serde(rename = "classifier__solver")]
    pub classifier_solver: &'static str,
    #[serde(rename = "tfidf__min_df")]
    pub tfidf_min_df: u32,
    #[serde(rename = "tfidf__ngram_range")]
    pub tfidf_ngram_range: &'static str,
}

/// Quality metrics measured on the held-out set when the model was trained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub overall_accuracy: f64,
    pub macro_f1_score: f64,
    pub best_hyperparameters: Hyperparameters,
}

pub const MODEL_METRICS: ModelMetrics = ModelMetrics {
    overall_accuracy: 0.9000,
    macro_f1_score: 0.8964,
    best_hyperparameters: Hyperparameters {
        classifier_c: 10,
        classifier_solver: "liblinear",
        tfidf_min_df: 1,
        tfidf_ngram_range: "(1, 1)",
    },
};

/// Descriptive metadata about the deployed model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub version: String,
    pub model_metrics: ModelMetrics,
    pub supported_intents: Vec<String>,
    pub last_trained: String,
}

impl ModelInfo {
    /// Combines the offline metrics with the intents of the loaded label space.
    pub fn for_labels(labels: &LabelSpace) -> Self {
        Self {
            model_name: MODEL_NAME.to_string(),
            version: MODEL_VERSION.to_string(),
            model_metrics: MODEL_METRICS,
            supported_intents: labels.as_slice().to_vec(),
            last_trained: LAST_TRAINED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_keys() -> Result<(), Box<dyn std::error::Error>> {
        let labels = LabelSpace::new(vec!["calendar_schedule", "email_send"])?;
        let value = serde_json::to_value(ModelInfo::for_labels(&labels))?;

        assert_eq!(value["model_name"], MODEL_NAME);
        assert_eq!(value["model_metrics"]["overall_accuracy"], 0.9);
        assert_eq!(value["model_metrics"]["best_hyperparameters"]["classifier__C"], 10);
        assert_eq!(value["model_metrics"]["best_hyperparameters"]["tfidf__ngram_range"], "(1, 1)");
        assert_eq!(value["supported_intents"], serde_json::json!(["calendar_schedule", "email_send"]));
        assert_eq!(value["last_trained"], "2025-09-29");
        Ok(())
    }
}
