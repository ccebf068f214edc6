use std::sync::Arc;

use clap::Parser;
use intent_service::{api, AdminCredentials, AppState, DirArtifactSource, InferenceEngine, ServiceConfig};
use log::{error, info};
use tokio::net::TcpListener;

/// Reads the artifacts once; on failure the service keeps running and reports 503.
async fn load_engine(engine: Arc<InferenceEngine>) {
    let loader = Arc::clone(&engine);
    match tokio::task::spawn_blocking(move || loader.load()).await {
        Ok(Ok(())) => info!("Model ready"),
        Ok(Err(e)) => error!(
            "FATAL: could not load the ML model. The API will be in a degraded state (503 errors). Error: {}",
            e
        ),
        Err(e) => error!("Model loading task failed: {}", e),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    intent_service::init_logger();
    let config = ServiceConfig::parse();

    info!("=== Starting Intent Classification Service ===");

    let source = DirArtifactSource::new(&config.artifacts_dir)
        .with_probability_output(config.probability_output.clone())
        .with_runtime_config(config.runtime_config());
    let engine = Arc::new(InferenceEngine::new(source));
    load_engine(Arc::clone(&engine)).await;

    let state = AppState::new(
        engine,
        AdminCredentials::new(&config.admin_user, &config.admin_password),
        config.inference_timeout(),
    );

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Application shutdown complete.");
    Ok(())
}
