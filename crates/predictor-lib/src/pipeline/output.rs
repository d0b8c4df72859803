//! Result assembly
//!
//! Builds the caller-facing outcome from the decision tuple. Display
//! rounding happens here and only here; the unrounded probability is kept on
//! the outcome for downstream consumers.

use crate::models::{ConfidenceTier, DelayLabel, Outcome};

/// Decimal digits kept for display.
const DISPLAY_DECIMALS: i32 = 4;

fn round_display(probability: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (probability * scale).round() / scale
}

/// Assemble the outcome. No side effects: does not log, does not persist.
pub fn assemble(
    label: DelayLabel,
    probability: f64,
    tier: ConfidenceTier,
    threshold: f64,
    defaulted_features: Vec<String>,
) -> Outcome {
    Outcome {
        label,
        probability: round_display(probability),
        raw_probability: probability,
        tier,
        threshold,
        defaulted_features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_rounded_to_four_decimals() {
        let outcome = assemble(
            DelayLabel::Retrasado,
            0.781256,
            ConfidenceTier::Alta,
            0.5591,
            Vec::new(),
        );
        assert_eq!(outcome.probability, 0.7813);
    }

    #[test]
    fn test_raw_probability_preserved() {
        let outcome = assemble(
            DelayLabel::Puntual,
            0.123456789,
            ConfidenceTier::Alta,
            0.5591,
            Vec::new(),
        );
        assert_eq!(outcome.raw_probability, 0.123456789);
    }

    #[test]
    fn test_applied_threshold_echoed() {
        let outcome = assemble(
            DelayLabel::Puntual,
            0.2,
            ConfidenceTier::Alta,
            0.4711,
            Vec::new(),
        );
        assert_eq!(outcome.threshold, 0.4711);
    }

    #[test]
    fn test_defaulted_features_carried() {
        let outcome = assemble(
            DelayLabel::Puntual,
            0.2,
            ConfidenceTier::Alta,
            0.5,
            vec!["origin_encoded".to_string()],
        );
        assert_eq!(outcome.defaulted_features, vec!["origin_encoded"]);
    }
}
