//! Fitted feature encoder
//!
//! The encoder turns a normalized flight into named feature values using the
//! categorical vocabularies fitted at training time. Inference only ever
//! runs the transform step; there is no fitting here and no fallback
//! encoding. A category the artifact cannot map is a hard error unless the
//! artifact itself declares an unknown-class index.

use crate::error::PredictError;
use crate::models::NormalizedFlight;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capability contract for the fitted feature encoder: one transform
/// operation from a normalized flight to named feature values.
pub trait FeatureEncoder: Send + Sync {
    fn transform(&self, flight: &NormalizedFlight) -> Result<Vec<(String, f32)>, PredictError>;
}

/// Fitted class-to-index mapping for one categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub classes: HashMap<String, u32>,
    /// Index reserved at fit time for unseen classes, if any.
    #[serde(default)]
    pub unknown: Option<u32>,
}

impl Vocabulary {
    fn encode(&self, column: &str, value: &str) -> Result<u32, PredictError> {
        if let Some(&index) = self.classes.get(value) {
            return Ok(index);
        }
        self.unknown.ok_or_else(|| {
            PredictError::FeatureBuild(format!(
                "value {value:?} not in fitted vocabulary for {column} and no unknown class declared"
            ))
        })
    }
}

/// Encoder artifact: per-column vocabularies for the categorical features,
/// fitted at training time and loaded read-only for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEncoder {
    pub op_unique_carrier: Vocabulary,
    pub origin: Vocabulary,
    pub dest: Vocabulary,
}

impl FeatureEncoder for VocabEncoder {
    fn transform(&self, flight: &NormalizedFlight) -> Result<Vec<(String, f32)>, PredictError> {
        let carrier = self
            .op_unique_carrier
            .encode("op_unique_carrier", &flight.carrier)?;
        let origin = self.origin.encode("origin", &flight.origin)?;
        let dest = self.dest.encode("dest", &flight.dest)?;

        Ok(vec![
            ("year".to_string(), flight.year as f32),
            ("month".to_string(), flight.month as f32),
            ("day_of_month".to_string(), flight.day_of_month as f32),
            ("day_of_week".to_string(), flight.day_of_week as f32),
            ("dep_hour".to_string(), flight.dep_hour as f32),
            (
                "sched_minute_of_day".to_string(),
                flight.sched_minute_of_day as f32,
            ),
            ("crs_dep_time".to_string(), flight.crs_dep_time as f32),
            ("distance".to_string(), flight.distance_miles as f32),
            ("temp".to_string(), flight.temp as f32),
            ("wind_spd".to_string(), flight.wind_spd as f32),
            ("precip_1h".to_string(), flight.precip_1h as f32),
            (
                "climate_severity_idx".to_string(),
                flight.climate_severity_idx as f32,
            ),
            ("dist_met_km".to_string(), flight.dist_met_km as f32),
            ("latitude".to_string(), flight.latitude as f32),
            ("longitude".to_string(), flight.longitude as f32),
            ("op_unique_carrier_encoded".to_string(), carrier as f32),
            ("origin_encoded".to_string(), origin as f32),
            ("dest_encoded".to_string(), dest as f32),
        ])
    }
}
