//! Classifier invocation
//!
//! Wraps the trained binary classifier behind a fixed capability contract
//! and runs it on exactly one canonical feature vector per call. There is no
//! retry and no fallback heuristic: a classifier failure surfaces as an
//! `Inference` error with a wrapped diagnostic.

use crate::error::PredictError;
use crate::models::FeatureVector;
use anyhow::{anyhow, Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Inference latency target before a warning is logged (milliseconds).
const MAX_INFERENCE_MS: u128 = 5;

/// Tolerance for floating-point noise around the [0, 1] probability range.
const PROBABILITY_EPSILON: f64 = 1e-6;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Capability contract for the trained classifier: probability of the
/// positive ("delayed") class given a single feature row.
pub trait DelayClassifier: Send + Sync {
    fn delay_probability(&self, features: &[f32]) -> Result<f64>;
}

/// Run the classifier on one feature vector.
///
/// The returned probability is a 64-bit float in [0, 1], unrounded; display
/// rounding happens at result assembly.
pub fn invoke(
    classifier: &dyn DelayClassifier,
    features: &FeatureVector,
) -> Result<f64, PredictError> {
    let start = Instant::now();

    let probability = classifier
        .delay_probability(features.values())
        .map_err(PredictError::Inference)?;

    if !probability.is_finite() {
        return Err(PredictError::Inference(anyhow!(
            "classifier returned non-finite probability {probability}"
        )));
    }
    if !(-PROBABILITY_EPSILON..=1.0 + PROBABILITY_EPSILON).contains(&probability) {
        return Err(PredictError::Inference(anyhow!(
            "classifier returned probability {probability} outside [0, 1]"
        )));
    }

    let elapsed = start.elapsed();
    if elapsed.as_millis() > MAX_INFERENCE_MS {
        warn!(
            elapsed_ms = elapsed.as_millis(),
            "Inference exceeded {}ms target", MAX_INFERENCE_MS
        );
    } else {
        debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
    }

    Ok(probability.clamp(0.0, 1.0))
}

/// ONNX-backed classifier using tract for lightweight inference.
pub struct OnnxClassifier {
    model: TractModel,
    input_width: usize,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model from bytes. `input_width` is the
    /// number of features the model was fit on.
    pub fn from_bytes(model_bytes: &[u8], input_width: usize) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(Self { model, input_width })
    }
}

impl DelayClassifier for OnnxClassifier {
    fn delay_probability(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.input_width {
            anyhow::bail!(
                "feature row has {} values, model expects {}",
                features.len(),
                self.input_width
            );
        }

        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, self.input_width), features.to_vec())
                .context("Failed to build input tensor")?
                .into();

        let result = self.model.run(tvec!(input.into()))?;
        // Graphs converted from sklearn/xgboost emit (label, probabilities);
        // the probability tensor is the last output.
        let output = result.last().context("No output from model")?;
        let values: Vec<f32> = output.to_array_view::<f32>()?.iter().copied().collect();

        match values.as_slice() {
            // Single sigmoid column: already the positive-class probability.
            [p] => Ok(*p as f64),
            // Two-column distribution: positive class is the second column.
            [_, p] => Ok(*p as f64),
            other => anyhow::bail!(
                "model output has {} values, expected 1 or 2",
                other.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(f64);

    impl DelayClassifier for FixedClassifier {
        fn delay_probability(&self, _features: &[f32]) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn feature_vector() -> FeatureVector {
        FeatureVector::new(vec![1.0, 2.0], Vec::new())
    }

    #[test]
    fn test_invoke_passes_probability_through_unrounded() {
        let p = invoke(&FixedClassifier(0.73214), &feature_vector()).unwrap();
        assert_eq!(p, 0.73214);
    }

    #[test]
    fn test_non_finite_probability_rejected() {
        match invoke(&FixedClassifier(f64::NAN), &feature_vector()) {
            Err(PredictError::Inference(_)) => {}
            other => panic!("expected inference error, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        match invoke(&FixedClassifier(1.7), &feature_vector()) {
            Err(PredictError::Inference(_)) => {}
            other => panic!("expected inference error, got {other:?}"),
        }
    }

    #[test]
    fn test_float_noise_clamped() {
        let p = invoke(&FixedClassifier(1.0 + 1e-9), &feature_vector()).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_invalid_model_bytes_rejected() {
        assert!(OnnxClassifier::from_bytes(b"not an onnx graph", 18).is_err());
    }
}
