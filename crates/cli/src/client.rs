//! API client for communicating with the FlightOnTime prediction API

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Prediction request payload
#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub aerolinea: String,
    pub origen: String,
    pub destino: String,
    pub fecha_partida: String,
    pub distancia_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocidad_viento: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitacion: Option<f64>,
}

/// Prediction returned by the service
#[derive(Debug, Deserialize, Serialize)]
pub struct Prediction {
    pub prevision: String,
    pub probabilidad: f64,
    pub confianza: String,
    pub detalles: Detalles,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Detalles {
    pub umbral_usado: f64,
    pub probabilidad_puntual: f64,
    pub probabilidad_retrasado: f64,
    #[serde(default)]
    pub features_por_defecto: Vec<String>,
}

/// Model information
#[derive(Debug, Deserialize, Serialize)]
pub struct ModelInfo {
    pub nombre: String,
    pub version: String,
    pub accuracy: Option<f64>,
    pub recall: Option<f64>,
    pub roc_auc: Option<f64>,
    pub threshold: f64,
    pub features: usize,
    pub registros_entrenamiento: Option<u64>,
}

/// Service health
#[derive(Debug, Deserialize, Serialize)]
pub struct Health {
    pub status: String,
    pub modelo_cargado: bool,
    pub version_api: String,
    pub timestamp: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        self.post("/predict", request).await
    }

    pub async fn model_info(&self) -> Result<ModelInfo> {
        self.get("/model-info").await
    }

    pub async fn health(&self) -> Result<Health> {
        self.get("/health").await
    }
}
