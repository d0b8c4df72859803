//! Server configuration

use anyhow::Result;
use predictor_lib::ArtifactPaths;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration, read from `FOT_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Trained classifier (ONNX)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Fitted categorical vocabularies
    #[serde(default = "default_encoder_path")]
    pub encoder_path: String,

    /// Model metadata (feature names, threshold, training metrics)
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,
}

fn default_api_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "models/model.onnx".to_string()
}

fn default_encoder_path() -> String {
    "models/encoder.json".to_string()
}

fn default_metadata_path() -> String {
    "models/metadata.json".to_string()
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("FOT"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            model_path: default_model_path(),
            encoder_path: default_encoder_path(),
            metadata_path: default_metadata_path(),
        }))
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: PathBuf::from(&self.model_path),
            encoder: PathBuf::from(&self.encoder_path),
            metadata: PathBuf::from(&self.metadata_path),
        }
    }
}
