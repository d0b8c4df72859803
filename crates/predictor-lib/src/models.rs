//! Core data models for the flight delay predictor

use serde::{Deserialize, Serialize};

/// Raw flight record as supplied by the caller.
///
/// Required fields are assumed to have passed transport-level validation;
/// optional weather/geo fields may be absent and are filled with the
/// canonical defaults during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    pub carrier: String,
    pub origin: String,
    pub dest: String,
    /// Scheduled departure as an ISO-8601 string.
    pub departure: String,
    pub distance_km: f64,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation: Option<f64>,
    pub climate_severity: Option<f64>,
    pub station_distance_km: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Flight record after normalization: no missing optional values, all
/// derived temporal and unit fields populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFlight {
    pub carrier: String,
    pub origin: String,
    pub dest: String,
    pub year: i32,
    pub month: u32,
    pub day_of_month: u32,
    /// 1=Monday .. 7=Sunday.
    pub day_of_week: u32,
    pub dep_hour: u32,
    pub sched_minute_of_day: u32,
    /// Scheduled departure in HHMM flight-schedule notation (hour*100 + minute).
    pub crs_dep_time: u32,
    pub distance_miles: f64,
    pub temp: f64,
    pub wind_spd: f64,
    pub precip_1h: f64,
    pub climate_severity_idx: f64,
    pub dist_met_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Canonical feature vector: values in exactly the order of the model's
/// `feature_names`. Constructed fresh per request and never mutated.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    values: Vec<f32>,
    /// Names from the expected list that the encoder did not emit and that
    /// were filled with the zero placeholder.
    defaulted: Vec<String>,
}

impl FeatureVector {
    pub(crate) fn new(values: Vec<f32>, defaulted: Vec<String>) -> Self {
        Self { values, defaulted }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn defaulted(&self) -> &[String] {
        &self.defaulted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Binary outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayLabel {
    Puntual,
    Retrasado,
}

impl DelayLabel {
    /// Numeric form of the label (0 = on time, 1 = delayed).
    pub fn as_class(self) -> u8 {
        match self {
            DelayLabel::Puntual => 0,
            DelayLabel::Retrasado => 1,
        }
    }
}

impl std::fmt::Display for DelayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelayLabel::Puntual => write!(f, "Puntual"),
            DelayLabel::Retrasado => write!(f, "Retrasado"),
        }
    }
}

/// Confidence tier derived from the distance to the fixed 0.5 boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Alta,
    Media,
    Baja,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Alta => write!(f, "Alta"),
            ConfidenceTier::Media => write!(f, "Media"),
            ConfidenceTier::Baja => write!(f, "Baja"),
        }
    }
}

/// Caller-facing prediction outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub label: DelayLabel,
    /// Delay probability rounded to 4 decimals for display.
    pub probability: f64,
    /// Unrounded delay probability for downstream consumers.
    #[serde(skip)]
    pub raw_probability: f64,
    pub tier: ConfidenceTier,
    /// Decision threshold actually applied.
    pub threshold: f64,
    /// Feature names that were filled with the zero placeholder.
    pub defaulted_features: Vec<String>,
}

/// Training metrics carried in the model metadata, surfaced by `/model-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub recall: f64,
    pub roc_auc: f64,
}

/// Metadata shipped next to the trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    /// Ordered feature list the classifier was fit on.
    pub feature_names: Vec<String>,
    /// Probability cutoff chosen during training/tuning.
    pub threshold: f64,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
    #[serde(default)]
    pub training_rows: Option<u64>,
}
