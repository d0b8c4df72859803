//! Flight delay prediction pipeline
//!
//! raw record -> normalizer -> aligner -> inference -> decision -> outcome.
//! Every stage is pure; the only shared state is the read-only artifact
//! bundle loaded at startup.

mod aligner;
mod decision;
mod encoder;
mod inference;
mod normalizer;
mod output;

pub use aligner::align;
pub use decision::{classify, confidence_score, confidence_tier, DecisionConfig, NEUTRAL_BOUNDARY};
pub use encoder::{FeatureEncoder, VocabEncoder, Vocabulary};
pub use inference::{invoke, DelayClassifier, OnnxClassifier};
pub use normalizer::{normalize, WeatherDefaults, KM_TO_MILES, WEATHER_DEFAULTS};
pub use output::assemble;

use crate::artifacts::ArtifactBundle;
use crate::error::PredictError;
use crate::models::{FlightRecord, ModelMetadata, Outcome};
use std::sync::Arc;

/// The pipeline entry point: owns a handle to the immutable artifact bundle
/// and the decision policy constants.
pub struct PredictionPipeline {
    artifacts: Arc<ArtifactBundle>,
    decision: DecisionConfig,
}

impl PredictionPipeline {
    pub fn new(artifacts: Arc<ArtifactBundle>) -> Self {
        Self {
            artifacts,
            decision: DecisionConfig::default(),
        }
    }

    pub fn with_decision_config(artifacts: Arc<ArtifactBundle>, decision: DecisionConfig) -> Self {
        Self { artifacts, decision }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.artifacts.metadata
    }

    /// Predict whether the flight will be delayed.
    pub fn predict(&self, record: &FlightRecord) -> Result<Outcome, PredictError> {
        let normalized = normalize(record)?;
        let transformed = self.artifacts.encoder.transform(&normalized)?;
        let features = align(transformed, &self.artifacts.metadata.feature_names)?;
        let probability = invoke(self.artifacts.classifier.as_ref(), &features)?;

        let threshold = self.artifacts.metadata.threshold;
        let label = classify(probability, threshold);
        let tier = confidence_tier(probability, &self.decision);

        Ok(assemble(
            label,
            probability,
            tier,
            threshold,
            features.defaulted().to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceTier, DelayLabel, FeatureVector};
    use crate::pipeline::encoder::tests::test_encoder;
    use anyhow::Result;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Deterministic logistic stub. Weights vary by feature index, so the
    /// stub is sensitive both to feature order and to the weather features.
    struct LogisticStub {
        calls: Arc<AtomicU64>,
    }

    impl LogisticStub {
        fn new() -> (Self, Arc<AtomicU64>) {
            let calls = Arc::new(AtomicU64::new(0));
            (
                Self {
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn weight(i: usize) -> f64 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            sign * (i as f64 + 1.0) * 1e-5
        }

        fn score(features: &[f32]) -> f64 {
            let z: f64 = features
                .iter()
                .enumerate()
                .map(|(i, &x)| Self::weight(i) * x as f64)
                .sum();
            1.0 / (1.0 + (-z).exp())
        }
    }

    impl DelayClassifier for LogisticStub {
        fn delay_probability(&self, features: &[f32]) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Self::score(features))
        }
    }

    struct FixedClassifier(f64);

    impl DelayClassifier for FixedClassifier {
        fn delay_probability(&self, _features: &[f32]) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn feature_names() -> Vec<String> {
        [
            "year",
            "month",
            "day_of_month",
            "day_of_week",
            "dep_hour",
            "sched_minute_of_day",
            "crs_dep_time",
            "distance",
            "temp",
            "wind_spd",
            "precip_1h",
            "climate_severity_idx",
            "dist_met_km",
            "latitude",
            "longitude",
            "op_unique_carrier_encoded",
            "origin_encoded",
            "dest_encoded",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn metadata(threshold: f64) -> ModelMetadata {
        ModelMetadata {
            model_name: "xgb-delay".to_string(),
            feature_names: feature_names(),
            threshold,
            metrics: None,
            training_rows: None,
        }
    }

    fn pipeline_with(classifier: Box<dyn DelayClassifier>, threshold: f64) -> PredictionPipeline {
        let bundle =
            ArtifactBundle::new(classifier, Box::new(test_encoder()), metadata(threshold)).unwrap();
        PredictionPipeline::new(Arc::new(bundle))
    }

    fn scenario_a_record() -> FlightRecord {
        FlightRecord {
            carrier: "AA".to_string(),
            origin: "JFK".to_string(),
            dest: "LAX".to_string(),
            departure: "2025-11-10T14:30:00".to_string(),
            distance_km: 3983.0,
            temperature: None,
            wind_speed: None,
            precipitation: None,
            climate_severity: None,
            station_distance_km: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_scenario_a_defaults_and_single_invocation() {
        let (stub, calls) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let outcome = pipeline.predict(&scenario_a_record()).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!((0.0..=1.0).contains(&outcome.probability));
        assert!(matches!(
            outcome.label,
            DelayLabel::Puntual | DelayLabel::Retrasado
        ));
        assert!(matches!(
            outcome.tier,
            ConfidenceTier::Alta | ConfidenceTier::Media | ConfidenceTier::Baja
        ));
        assert_eq!(outcome.threshold, 0.5591);
        assert!(outcome.defaulted_features.is_empty());
    }

    #[test]
    fn test_scenario_b_weather_changes_outcome() {
        let (stub, _) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let mut with_weather = scenario_a_record();
        with_weather.temperature = Some(25.5);
        with_weather.wind_speed = Some(15.3);
        with_weather.precipitation = Some(0.0);

        let a = pipeline.predict(&scenario_a_record()).unwrap();
        let b = pipeline.predict(&with_weather).unwrap();

        assert_ne!(a.raw_probability, b.raw_probability);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let (stub, _) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let first = pipeline.predict(&scenario_a_record()).unwrap();
        let second = pipeline.predict(&scenario_a_record()).unwrap();

        assert_eq!(first.raw_probability, second.raw_probability);
        assert_eq!(first.label, second.label);
        assert_eq!(first.tier, second.tier);
    }

    #[test]
    fn test_default_fill_idempotence() {
        let (stub, _) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let mut explicit = scenario_a_record();
        explicit.temperature = Some(WEATHER_DEFAULTS.temperature);
        explicit.wind_speed = Some(WEATHER_DEFAULTS.wind_speed);
        explicit.precipitation = Some(WEATHER_DEFAULTS.precipitation);
        explicit.climate_severity = Some(WEATHER_DEFAULTS.climate_severity);
        explicit.station_distance_km = Some(WEATHER_DEFAULTS.station_distance_km);
        explicit.latitude = Some(WEATHER_DEFAULTS.latitude);
        explicit.longitude = Some(WEATHER_DEFAULTS.longitude);

        let omitted = pipeline.predict(&scenario_a_record()).unwrap();
        let filled = pipeline.predict(&explicit).unwrap();

        assert_eq!(omitted.raw_probability, filled.raw_probability);
        assert_eq!(omitted.label, filled.label);
    }

    #[test]
    fn test_probability_at_threshold_classifies_delayed() {
        let pipeline = pipeline_with(Box::new(FixedClassifier(0.5591)), 0.5591);
        let outcome = pipeline.predict(&scenario_a_record()).unwrap();
        assert_eq!(outcome.label, DelayLabel::Retrasado);
    }

    #[test]
    fn test_malformed_timestamp_never_reaches_classifier() {
        let (stub, calls) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let mut record = scenario_a_record();
        record.departure = "not-a-date".to_string();

        match pipeline.predict(&record) {
            Err(PredictError::Validation(_)) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    /// Negative test: the classifier is order-sensitive, so the aligner's
    /// ordering guarantee is load-bearing.
    #[test]
    fn test_reordered_features_change_the_result() {
        let normalized = normalize(&scenario_a_record()).unwrap();
        let transformed = test_encoder().transform(&normalized).unwrap();
        let aligned = align(transformed, &feature_names()).unwrap();

        let mut shuffled = aligned.values().to_vec();
        shuffled.reverse();
        let shuffled = FeatureVector::new(shuffled, Vec::new());

        let (stub, _) = LogisticStub::new();
        let ordered_p = invoke(&stub, &aligned).unwrap();
        let shuffled_p = invoke(&stub, &shuffled).unwrap();

        assert_ne!(ordered_p, shuffled_p);
    }

    #[test]
    fn test_unknown_carrier_is_feature_build_error() {
        let (stub, calls) = LogisticStub::new();
        let pipeline = pipeline_with(Box::new(stub), 0.5591);

        let mut record = scenario_a_record();
        record.carrier = "ZZ".to_string();

        match pipeline.predict(&record) {
            Err(PredictError::FeatureBuild(_)) => {}
            other => panic!("expected feature build error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
