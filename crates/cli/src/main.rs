//! FlightOnTime CLI
//!
//! A command-line client for the flight delay prediction API.

mod client;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// FlightOnTime CLI
#[derive(Parser)]
#[command(name = "fot")]
#[command(author, version, about = "CLI for the FlightOnTime prediction API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via FOT_API_URL env var)
    #[arg(long, env = "FOT_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "text")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict whether a flight will be delayed
    Predict {
        /// Carrier code (e.g. AA, DL, UA)
        #[arg(long)]
        carrier: String,

        /// Origin airport IATA code (e.g. JFK)
        #[arg(long)]
        origin: String,

        /// Destination airport IATA code (e.g. LAX)
        #[arg(long)]
        dest: String,

        /// Scheduled departure, ISO-8601 (e.g. 2025-11-10T14:30:00)
        #[arg(long)]
        departure: String,

        /// Flight distance in kilometers
        #[arg(long)]
        distance_km: f64,

        /// Temperature at origin in °C
        #[arg(long)]
        temperature: Option<f64>,

        /// Wind speed in km/h
        #[arg(long)]
        wind_speed: Option<f64>,

        /// Precipitation in mm
        #[arg(long)]
        precipitation: Option<f64>,
    },

    /// Show information about the loaded model
    Info,

    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Predict {
            carrier,
            origin,
            dest,
            departure,
            distance_km,
            temperature,
            wind_speed,
            precipitation,
        } => {
            let request = client::PredictRequest {
                aerolinea: carrier,
                origen: origin,
                destino: dest,
                fecha_partida: departure,
                distancia_km: distance_km,
                temperatura: temperature,
                velocidad_viento: wind_speed,
                precipitacion: precipitation,
            };
            let prediction = client.predict(&request).await?;
            output::print_prediction(&prediction, cli.format);
        }
        Commands::Info => {
            let info = client.model_info().await?;
            output::print_model_info(&info, cli.format);
        }
        Commands::Health => {
            let health = client.health().await?;
            output::print_health(&health, cli.format);
        }
    }

    Ok(())
}
