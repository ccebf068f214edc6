use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// The ordered, closed set of intent labels the classifier can emit.
///
/// Index `i` names column `i` of the model's probability output, so the order
/// here must match the order the encoder had at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpace {
    classes: Vec<String>,
}

impl LabelSpace {
    /// Builds a label space after checking it is non-empty, with no blank or repeated labels.
    pub fn new(classes: Vec<impl Into<String>>) -> Result<Self, EngineError> {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        Self::validate(&classes)?;
        Ok(Self { classes })
    }

    /// Reads a serialized label encoder of the form `{"classes": [...]}`.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(EngineError::ArtifactNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|e| {
            EngineError::ArtifactInvalid(format!("Failed to read label encoder {}: {}", path.display(), e))
        })?;
        let space: LabelSpace = serde_json::from_slice(&bytes).map_err(|e| {
            EngineError::ArtifactInvalid(format!("Failed to parse label encoder {}: {}", path.display(), e))
        })?;
        Self::validate(&space.classes)?;
        Ok(space)
    }

    fn validate(classes: &[String]) -> Result<(), EngineError> {
        if classes.is_empty() {
            return Err(EngineError::ArtifactInvalid("Label encoder has no classes".into()));
        }
        if let Some(pos) = classes.iter().position(|c| c.trim().is_empty()) {
            return Err(EngineError::ArtifactInvalid(format!("Label {} is empty", pos)));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(EngineError::ArtifactInvalid(format!("Duplicate label '{}'", dup)));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.classes
    }
}
