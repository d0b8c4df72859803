//! HTTP API for flight delay predictions
//!
//! Routes: `POST /predict`, `GET /health`, `GET /model-info`,
//! `GET /metrics`. The transport owns request-schema validation and the
//! mapping from pipeline errors to status codes; the pipeline itself never
//! sees a malformed required field.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    FlightRecord, PredictError, PredictionPipeline, PredictorMetrics,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state
///
/// `pipeline` is `None` when artifact loading failed at startup: the server
/// stays up but refuses prediction traffic with 503 rather than guessing.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Option<Arc<PredictionPipeline>>,
    pub metrics: PredictorMetrics,
}

impl AppState {
    pub fn new(pipeline: Option<Arc<PredictionPipeline>>, metrics: PredictorMetrics) -> Self {
        Self { pipeline, metrics }
    }
}

/// Prediction request (canonical wire contract).
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub aerolinea: String,
    pub origen: String,
    pub destino: String,
    pub fecha_partida: String,
    pub distancia_km: f64,
    #[serde(default)]
    pub temperatura: Option<f64>,
    #[serde(default)]
    pub velocidad_viento: Option<f64>,
    #[serde(default)]
    pub precipitacion: Option<f64>,
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub dist_met_km: Option<f64>,
}

impl PredictRequest {
    /// Transport-level validation, then conversion to the core record.
    fn into_record(self) -> Result<FlightRecord, ApiError> {
        let carrier = self.aerolinea.trim().to_uppercase();
        if !(2..=3).contains(&carrier.len()) || !carrier.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ApiError::bad_request(format!(
                "aerolinea debe ser un código de 2-3 caracteres, recibido {:?}",
                self.aerolinea
            )));
        }

        let origin = validate_airport("origen", &self.origen)?;
        let dest = validate_airport("destino", &self.destino)?;

        if !self.distancia_km.is_finite() || self.distancia_km <= 0.0 {
            return Err(ApiError::bad_request(format!(
                "distancia_km debe ser positiva, recibido {}",
                self.distancia_km
            )));
        }
        if let Some(t) = self.temperatura {
            if !(-50.0..=60.0).contains(&t) {
                return Err(ApiError::bad_request(format!(
                    "temperatura fuera de rango [-50, 60]: {t}"
                )));
            }
        }
        if matches!(self.velocidad_viento, Some(v) if v < 0.0) {
            return Err(ApiError::bad_request(
                "velocidad_viento no puede ser negativa".to_string(),
            ));
        }
        if matches!(self.precipitacion, Some(p) if p < 0.0) {
            return Err(ApiError::bad_request(
                "precipitacion no puede ser negativa".to_string(),
            ));
        }

        Ok(FlightRecord {
            carrier,
            origin,
            dest,
            departure: self.fecha_partida,
            distance_km: self.distancia_km,
            temperature: self.temperatura,
            wind_speed: self.velocidad_viento,
            precipitation: self.precipitacion,
            climate_severity: None,
            station_distance_km: self.dist_met_km,
            latitude: self.latitud,
            longitude: self.longitud,
        })
    }
}

fn validate_airport(field: &str, code: &str) -> Result<String, ApiError> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::bad_request(format!(
            "{field} debe ser un código IATA de 3 letras, recibido {code:?}"
        )));
    }
    Ok(code)
}

/// Prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prevision: String,
    pub probabilidad: f64,
    pub confianza: String,
    pub detalles: Detalles,
}

#[derive(Debug, Serialize)]
pub struct Detalles {
    pub umbral_usado: f64,
    pub probabilidad_puntual: f64,
    pub probabilidad_retrasado: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features_por_defecto: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub modelo_cargado: bool,
    pub version_api: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub nombre: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roc_auc: Option<f64>,
    pub threshold: f64,
    pub features: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registros_entrenamiento: Option<u64>,
}

/// Error response: status code plus a human-readable diagnostic.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn service_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Modelo no disponible. Intente más tarde.".to_string(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        let status = match err {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::FeatureBuild(_) | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

fn round_display(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 10_000.0
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(ApiError::service_unavailable)?;

    let record = request.into_record()?;

    let start = Instant::now();
    let outcome = pipeline.predict(&record).map_err(|err| {
        state.metrics.inc_prediction_error(err.kind());
        warn!(
            carrier = %record.carrier,
            origin = %record.origin,
            dest = %record.dest,
            kind = err.kind(),
            error = %err,
            "Prediction failed"
        );
        ApiError::from(err)
    })?;
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_prediction(&outcome.label.to_string());

    info!(
        event = "prediction_served",
        carrier = %record.carrier,
        origin = %record.origin,
        dest = %record.dest,
        label = %outcome.label,
        probability = outcome.probability,
        tier = %outcome.tier,
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prevision: outcome.label.to_string(),
        probabilidad: outcome.probability,
        confianza: outcome.tier.to_string(),
        detalles: Detalles {
            umbral_usado: outcome.threshold,
            probabilidad_puntual: round_display(1.0 - outcome.raw_probability),
            probabilidad_retrasado: outcome.probability,
            features_por_defecto: outcome.defaulted_features,
        },
    }))
}

/// Liveness-style health check: always 200, reports whether the model is
/// loaded.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let loaded = state.pipeline.is_some();
    Json(HealthResponse {
        status: if loaded { "healthy" } else { "unhealthy" }.to_string(),
        modelo_cargado: loaded,
        version_api: API_VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(ApiError::service_unavailable)?;
    let metadata = pipeline.metadata();

    Ok(Json(ModelInfoResponse {
        nombre: metadata.model_name.clone(),
        version: API_VERSION.to_string(),
        accuracy: metadata.metrics.as_ref().map(|m| m.accuracy),
        recall: metadata.metrics.as_ref().map(|m| m.recall),
        roc_auc: metadata.metrics.as_ref().map(|m| m.roc_auc),
        threshold: metadata.threshold,
        features: metadata.feature_names.len(),
        registros_entrenamiento: metadata.training_rows,
    }))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/model-info", get(model_info))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
