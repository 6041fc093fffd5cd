//! Revcast Server - sales revenue prediction over HTTP
//!
//! Loads the pipeline artifact once at startup and serves `GET /` and
//! `POST /predict`. Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=best_pipeline_model.json cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `SERVER_HOST` / `SERVER_PORT` - Bind address (default: 0.0.0.0:8000)
//! - `MODEL_PATH` - Pipeline artifact (default: best_pipeline_model.json)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use revcast::application::ml::ArtifactLoader;
use revcast::application::prediction_service::PredictionService;
use revcast::config::Config;
use revcast::infrastructure::observability::{Metrics, MetricsReporter};
use revcast::interfaces::http::create_router;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Revcast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Bind={}:{}, Model={:?}",
        config.server.host, config.server.port, config.model.path
    );

    let model = ArtifactLoader::load(&config.model.path);
    if model.is_none() {
        warn!("Starting without a model. /predict will answer 503 until restart.");
    }

    let metrics = Metrics::new().context("Failed to register metrics")?;
    let service = Arc::new(PredictionService::new(model, metrics.clone()));

    if config.observability.enabled {
        let interval = config.observability.interval_seconds;
        let reporter = MetricsReporter::new(metrics, service.model_snapshot(), interval);

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    let addrs = config.server.socket_addrs()?;
    let listener = tokio::net::TcpListener::bind(addrs.as_slice())
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    let addr = listener.local_addr()?;
    info!("Listening on http://{}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
