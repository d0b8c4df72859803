//! Core library for the FlightOnTime delay prediction service
//!
//! This crate provides:
//! - Record normalization and feature alignment
//! - Classifier invocation over tract-onnx
//! - Decision policy and result assembly
//! - Artifact loading and Prometheus metrics

pub mod artifacts;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;

pub use artifacts::{ArtifactBundle, ArtifactPaths};
pub use error::{ArtifactError, PredictError};
pub use models::*;
pub use observability::PredictorMetrics;
pub use pipeline::PredictionPipeline;
