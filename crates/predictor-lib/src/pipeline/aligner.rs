//! Feature alignment
//!
//! Guarantees the exact column set and order the classifier was fit on. The
//! classifier is order-sensitive, so alignment is a correctness stage, not a
//! cosmetic one: values are re-ordered to match `feature_names` exactly, and
//! expected names the encoder did not emit are filled with a zero
//! placeholder that is surfaced in the outcome diagnostics.

use crate::error::PredictError;
use crate::models::FeatureVector;
use std::collections::HashMap;
use tracing::warn;

/// Align the encoder's transform output to the model's expected feature
/// list.
pub fn align(
    transformed: Vec<(String, f32)>,
    feature_names: &[String],
) -> Result<FeatureVector, PredictError> {
    if transformed.is_empty() {
        return Err(PredictError::FeatureBuild(
            "encoder transform produced no features".to_string(),
        ));
    }

    let mut by_name: HashMap<String, f32> = HashMap::with_capacity(transformed.len());
    for (name, value) in transformed {
        if by_name.insert(name.clone(), value).is_some() {
            return Err(PredictError::FeatureBuild(format!(
                "encoder transform emitted duplicate feature {name:?}"
            )));
        }
    }

    let mut values = Vec::with_capacity(feature_names.len());
    let mut defaulted = Vec::new();
    for name in feature_names {
        match by_name.get(name) {
            Some(&value) => values.push(value),
            None => {
                values.push(0.0);
                defaulted.push(name.clone());
            }
        }
    }

    if !defaulted.is_empty() {
        warn!(features = ?defaulted, "Expected features missing from encoder output, zero-filled");
    }

    Ok(FeatureVector::new(values, defaulted))
}
