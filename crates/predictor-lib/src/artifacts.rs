//! Model artifact bundle
//!
//! The classifier, the fitted encoder, and the model metadata are loaded
//! once at startup into an immutable bundle that is passed by reference into
//! the pipeline. Load fails fast on any absent or unreadable artifact; a
//! service holding no bundle must refuse prediction traffic.

use crate::error::ArtifactError;
use crate::models::ModelMetadata;
use crate::pipeline::{DelayClassifier, FeatureEncoder, OnnxClassifier, VocabEncoder};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Filesystem locations of the three artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoder: PathBuf,
    pub metadata: PathBuf,
}

/// Immutable artifact set shared read-only across all requests.
pub struct ArtifactBundle {
    pub classifier: Box<dyn DelayClassifier>,
    pub encoder: Box<dyn FeatureEncoder>,
    pub metadata: ModelMetadata,
}

impl ArtifactBundle {
    /// Assemble a bundle from already-constructed parts, enforcing the
    /// metadata invariants.
    pub fn new(
        classifier: Box<dyn DelayClassifier>,
        encoder: Box<dyn FeatureEncoder>,
        metadata: ModelMetadata,
    ) -> Result<Self, ArtifactError> {
        validate_metadata(&metadata)?;
        Ok(Self {
            classifier,
            encoder,
            metadata,
        })
    }

    /// Load all three artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let metadata: ModelMetadata = read_json(&paths.metadata)?;
        validate_metadata(&metadata)?;

        let encoder: VocabEncoder = read_json(&paths.encoder)?;

        let model_bytes = std::fs::read(&paths.model).map_err(|source| ArtifactError::Io {
            path: paths.model.display().to_string(),
            source,
        })?;
        let classifier = OnnxClassifier::from_bytes(&model_bytes, metadata.feature_names.len())
            .map_err(ArtifactError::Model)?;

        info!(
            model = %metadata.model_name,
            threshold = metadata.threshold,
            features = metadata.feature_names.len(),
            "Model artifacts loaded"
        );

        Ok(Self {
            classifier: Box::new(classifier),
            encoder: Box::new(encoder),
            metadata,
        })
    }
}

fn validate_metadata(metadata: &ModelMetadata) -> Result<(), ArtifactError> {
    if metadata.feature_names.is_empty() {
        return Err(ArtifactError::InvalidMetadata(
            "feature_names is empty".to_string(),
        ));
    }
    if !metadata.threshold.is_finite() || !(0.0..=1.0).contains(&metadata.threshold) {
        return Err(ArtifactError::InvalidMetadata(format!(
            "threshold {} outside [0, 1]",
            metadata.threshold
        )));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
