//! Decision policy
//!
//! Thresholds the delay probability and assigns a confidence tier. The
//! binary decision uses the metadata-supplied threshold with a closed lower
//! bound; the tier is measured from the fixed 0.5 boundary, independent of
//! that threshold.

use crate::models::{ConfidenceTier, DelayLabel};

/// Probability boundary the confidence tiers are measured from.
pub const NEUTRAL_BOUNDARY: f64 = 0.5;

/// Policy constants for confidence tiering, applied to the confidence
/// score (distance from the neutral boundary normalized over the
/// half-interval, so 0.5 scores 0 and 0.0/1.0 score 1).
#[derive(Debug, Clone, Copy)]
pub struct DecisionConfig {
    /// Confidence score above which the tier is Alta.
    pub high_cutoff: f64,
    /// Confidence score above which the tier is Media.
    pub medium_cutoff: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            high_cutoff: 0.30,
            medium_cutoff: 0.15,
        }
    }
}

/// Threshold the probability. A probability exactly equal to the threshold
/// classifies as delayed.
pub fn classify(probability: f64, threshold: f64) -> DelayLabel {
    if probability >= threshold {
        DelayLabel::Retrasado
    } else {
        DelayLabel::Puntual
    }
}

/// Confidence score in [0, 1]: how far the probability sits from the
/// neutral boundary, as a fraction of the half-interval.
pub fn confidence_score(probability: f64) -> f64 {
    2.0 * (probability - NEUTRAL_BOUNDARY).abs()
}

/// Assign the confidence tier.
pub fn confidence_tier(probability: f64, config: &DecisionConfig) -> ConfidenceTier {
    let score = confidence_score(probability);
    if score > config.high_cutoff {
        ConfidenceTier::Alta
    } else if score > config.medium_cutoff {
        ConfidenceTier::Media
    } else {
        ConfidenceTier::Baja
    }
}
