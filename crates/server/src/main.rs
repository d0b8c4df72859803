//! FlightOnTime API - flight delay prediction service
//!
//! Loads the trained classifier, the fitted encoder, and the model metadata
//! at startup, then serves predictions over HTTP. If artifact loading
//! fails, the server stays up and refuses prediction traffic with 503.

use anyhow::Result;
use flightontime_api::{api, config};
use predictor_lib::{ArtifactBundle, PredictionPipeline, PredictorMetrics};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting flightontime-api");

    let config = config::ServerConfig::load()?;
    let metrics = PredictorMetrics::new();

    let pipeline = match ArtifactBundle::load(&config.artifact_paths()) {
        Ok(bundle) => {
            metrics.set_model_info(&bundle.metadata.model_name);
            Some(Arc::new(PredictionPipeline::new(Arc::new(bundle))))
        }
        Err(e) => {
            error!(error = %e, "Failed to load model artifacts, serving without a model");
            None
        }
    };

    let app_state = Arc::new(api::AppState::new(pipeline, metrics));

    let _api_server = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
