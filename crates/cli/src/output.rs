//! Output formatting utilities

use crate::client::{Health, ModelInfo, Prediction};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable format (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

/// Print a prediction outcome
pub fn print_prediction(prediction: &Prediction, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(prediction);
        return;
    }

    let label = match prediction.prevision.as_str() {
        "Retrasado" => prediction.prevision.as_str().red().bold(),
        _ => prediction.prevision.as_str().green().bold(),
    };
    let tier = match prediction.confianza.as_str() {
        "Alta" => prediction.confianza.as_str().green(),
        "Media" => prediction.confianza.as_str().yellow(),
        _ => prediction.confianza.as_str().red(),
    };

    println!("{} {}", "Previsión:".bold(), label);
    println!(
        "{} {:.2}%",
        "Probabilidad de retraso:".bold(),
        prediction.detalles.probabilidad_retrasado * 100.0
    );
    println!("{} {}", "Confianza:".bold(), tier);
    println!(
        "{} {:.4}",
        "Umbral aplicado:".bold(),
        prediction.detalles.umbral_usado
    );

    if !prediction.detalles.features_por_defecto.is_empty() {
        println!(
            "{} {} {}",
            "⚠".yellow().bold(),
            "Features rellenadas por defecto:".yellow(),
            prediction.detalles.features_por_defecto.join(", ")
        );
    }
}

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Campo")]
    field: String,
    #[tabled(rename = "Valor")]
    value: String,
}

/// Print model information as a table
pub fn print_model_info(info: &ModelInfo, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(info);
        return;
    }

    let mut rows = vec![
        InfoRow {
            field: "Modelo".to_string(),
            value: info.nombre.clone(),
        },
        InfoRow {
            field: "Versión API".to_string(),
            value: info.version.clone(),
        },
        InfoRow {
            field: "Umbral".to_string(),
            value: format!("{:.4}", info.threshold),
        },
        InfoRow {
            field: "Features".to_string(),
            value: info.features.to_string(),
        },
    ];
    if let Some(accuracy) = info.accuracy {
        rows.push(InfoRow {
            field: "Accuracy".to_string(),
            value: format!("{:.4}", accuracy),
        });
    }
    if let Some(recall) = info.recall {
        rows.push(InfoRow {
            field: "Recall".to_string(),
            value: format!("{:.4}", recall),
        });
    }
    if let Some(roc_auc) = info.roc_auc {
        rows.push(InfoRow {
            field: "ROC AUC".to_string(),
            value: format!("{:.4}", roc_auc),
        });
    }
    if let Some(rows_count) = info.registros_entrenamiento {
        rows.push(InfoRow {
            field: "Registros de entrenamiento".to_string(),
            value: rows_count.to_string(),
        });
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print service health
pub fn print_health(health: &Health, format: OutputFormat) {
    if let OutputFormat::Json = format {
        print_json(health);
        return;
    }

    let status = if health.modelo_cargado {
        health.status.green().bold()
    } else {
        health.status.red().bold()
    };
    println!("{} {}", "Estado:".bold(), status);
    println!(
        "{} {}",
        "Modelo cargado:".bold(),
        if health.modelo_cargado { "sí" } else { "no" }
    );
    println!("{} {}", "Versión API:".bold(), health.version_api);
}
