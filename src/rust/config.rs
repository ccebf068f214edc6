use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::classifier::DEFAULT_PROBABILITY_OUTPUT;
use crate::runtime::RuntimeConfig;

/// Command-line and environment configuration for the service.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServiceConfig {
    /// Directory holding intent_classifier.onnx and intent_label_encoder.json
    #[arg(long, env = "INTENT_ARTIFACTS_DIR", default_value = "ml")]
    pub artifacts_dir: PathBuf,

    /// Address the HTTP server listens on
    #[arg(long, env = "INTENT_BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Username accepted on the model info endpoint
    #[arg(long, env = "INTENT_ADMIN_USER", default_value = "admin")]
    pub admin_user: String,

    /// Password accepted on the model info endpoint
    #[arg(long, env = "INTENT_ADMIN_PASSWORD", default_value = "secretpassword", hide_env_values = true)]
    pub admin_password: String,

    /// Upper bound on a single prediction call, in milliseconds
    #[arg(long, env = "INTENT_INFERENCE_TIMEOUT_MS", default_value_t = 5000)]
    pub inference_timeout_ms: u64,

    /// Name of the ONNX output holding class probabilities
    #[arg(long, env = "INTENT_PROBABILITY_OUTPUT", default_value = DEFAULT_PROBABILITY_OUTPUT)]
    pub probability_output: String,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, env = "INTENT_INTRA_THREADS", default_value_t = 0)]
    pub intra_threads: usize,
}

impl ServiceConfig {
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::default().with_intra_threads(self.intra_threads)
    }
}
