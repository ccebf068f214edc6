#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use intent_service::{ArtifactSource, Artifacts, EngineError, InferenceEngine, IntentModel, LabelSpace};
use ndarray::Array2;

pub const LABELS: [&str; 5] = [
    "calendar_schedule",
    "email_send",
    "general_chat",
    "knowledge_query",
    "web_search",
];

const KEYWORDS: [&[&str]; 5] = [
    &["book", "meeting", "schedule", "calendar"],
    &["email", "send", "mail"],
    &["hello", "hi", "thanks"],
    &["what", "who", "plus", "why"],
    &["find", "search", "nearest"],
];

/// Scores each label by keyword hits. Texts containing `boom` fail the whole
/// call; texts containing `slow` stall it.
pub struct KeywordModel {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl IntentModel for KeywordModel {
    fn predict_proba(&self, texts: &[String]) -> Result<Array2<f32>, EngineError> {
        self.calls.lock().unwrap().push(texts.to_vec());
        if texts.iter().any(|t| t.contains("boom")) {
            return Err(EngineError::InferenceFailure("numeric failure".into()));
        }
        if texts.iter().any(|t| t.contains("slow")) {
            std::thread::sleep(Duration::from_millis(300));
        }

        let mut out = Array2::zeros((texts.len(), LABELS.len()));
        for (i, text) in texts.iter().enumerate() {
            let scores: Vec<f32> = KEYWORDS
                .iter()
                .map(|keywords| {
                    let hits = text.split_whitespace().filter(|w| keywords.contains(w)).count();
                    1.0 + 4.0 * hits as f32
                })
                .collect();
            let total: f32 = scores.iter().sum();
            for (j, score) in scores.iter().enumerate() {
                out[[i, j]] = score / total;
            }
        }
        Ok(out)
    }
}

/// In-memory artifact store that counts how often it is read.
pub struct KeywordSource {
    reads: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl KeywordSource {
    pub fn new() -> Self {
        Self {
            reads: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ArtifactSource for KeywordSource {
    fn read(&self) -> Result<Artifacts, EngineError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Artifacts {
            model: Box::new(KeywordModel {
                calls: Arc::clone(&self.calls),
            }),
            labels: LabelSpace::new(LABELS.to_vec())?,
        })
    }

    fn describe(&self) -> String {
        "keyword fixture".into()
    }
}

/// An unloaded engine plus counters for storage reads and model invocations.
pub struct Fixture {
    pub engine: Arc<InferenceEngine>,
    pub reads: Arc<AtomicUsize>,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Fixture {
    pub fn new() -> Self {
        let reads = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let engine = Arc::new(InferenceEngine::new(KeywordSource {
            reads: Arc::clone(&reads),
            calls: Arc::clone(&calls),
        }));
        Self { engine, reads, calls }
    }

    pub fn loaded() -> Self {
        let fixture = Self::new();
        fixture.engine.load().expect("keyword fixture should load");
        fixture
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn model_calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}
