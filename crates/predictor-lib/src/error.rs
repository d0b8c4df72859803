//! Error taxonomy for the prediction pipeline
//!
//! All variants propagate unmodified to the transport boundary; none is
//! ever converted into a default prediction.

use thiserror::Error;

/// Errors produced by the prediction pipeline.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Malformed or unparseable required input. Maps to a client error.
    #[error("invalid flight record: {0}")]
    Validation(String),

    /// The normalized record could not be turned into the expected feature
    /// vector. Indicates artifact/code skew, not a bad request.
    #[error("feature construction failed: {0}")]
    FeatureBuild(String),

    /// The classifier invocation itself failed. Never retried.
    #[error("classifier inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}

impl PredictError {
    /// Stable kind string for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Validation(_) => "validation",
            PredictError::FeatureBuild(_) => "feature_build",
            PredictError::Inference(_) => "inference",
        }
    }
}

/// Errors while loading or validating the model artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid model metadata: {0}")]
    InvalidMetadata(String),

    #[error("failed to load classifier model: {0}")]
    Model(#[source] anyhow::Error),
}
