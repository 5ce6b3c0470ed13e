//! Turning query outcomes into stdout text and process exit codes.

use crate::cli::args::OutputFormat;
use crate::dataset::{DatasetSummary, TableSummary};
use crate::error::{LoadError, NotFoundContext, QueryError};
use crate::models::{LimingAdvice, PointValue, SoilOptions, SoilResponse, WeatherResponse};
use serde_json::{json, Value};

pub const EXIT_LOAD_FAILURE: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Soil(SoilResponse),
    Weather(WeatherResponse),
    Options(SoilOptions),
    Liming(LimingAdvice),
    Summary(DatasetSummary),
}

impl CommandOutput {
    pub fn to_json(&self) -> Value {
        let value = match self {
            CommandOutput::Soil(response) => serde_json::to_value(response),
            CommandOutput::Weather(response) => serde_json::to_value(response),
            CommandOutput::Options(options) => serde_json::to_value(options),
            CommandOutput::Liming(advice) => serde_json::to_value(advice),
            CommandOutput::Summary(summary) => serde_json::to_value(summary),
        };
        value.unwrap_or(Value::Null)
    }

    pub fn to_text(&self) -> String {
        match self {
            CommandOutput::Soil(response) => soil_text(response),
            CommandOutput::Weather(response) => weather_text(response),
            CommandOutput::Options(options) => options_text(options),
            CommandOutput::Liming(advice) => liming_text(advice),
            CommandOutput::Summary(summary) => summary_text(summary),
        }
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
            }
            OutputFormat::Text => self.to_text(),
        }
    }
}

/// HTTP status a request/response transport would attach to the outcome.
pub fn http_status(err: &QueryError) -> u16 {
    match err {
        QueryError::InvalidInput(_) => 400,
        QueryError::NotFound(_) => 404,
        QueryError::Unavailable { .. } => 503,
    }
}

pub fn exit_code(err: &QueryError) -> u8 {
    match err {
        QueryError::InvalidInput(_) => 2,
        QueryError::NotFound(_) => 3,
        QueryError::Unavailable { .. } => 4,
    }
}

pub fn error_json(err: &QueryError) -> Value {
    let detail = match err {
        QueryError::InvalidInput(reason) => json!(reason),
        QueryError::NotFound(context) => json!(context),
        QueryError::Unavailable { dataset, reason } => json!({
            "dataset": dataset,
            "reason": reason,
        }),
    };
    json!({
        "status": http_status(err),
        "error": err.kind(),
        "detail": detail,
    })
}

pub fn render_error(err: &QueryError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&error_json(err)).unwrap_or_default(),
        OutputFormat::Text => match err {
            QueryError::NotFound(context) => not_found_text(context),
            other => format!("Error: {}", other),
        },
    }
}

pub fn render_load_error(err: &LoadError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "status": 503,
                "error": "load_failed",
                "detail": err.to_string(),
            });
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Text => format!("Error: failed to load data: {}", err),
    }
}

fn point_text(point: &PointValue) -> String {
    match point {
        PointValue::Number(n) => n.to_string(),
        PointValue::Text(text) => text.clone(),
    }
}

fn soil_text(response: &SoilResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("Plot:  {}\n", response.talhao));
    out.push_str(&format!("Point: {}\n", point_text(&response.ponto)));
    out.push_str(&format!("Depth: {}", response.profundidade));
    if response.parametros.is_empty() {
        out.push_str("\n  (no parameter values)");
    }
    for (key, value) in &response.parametros {
        match response.unidades.get(key) {
            Some(units) => out.push_str(&format!("\n  {:<16} {} {}", key, value, units)),
            None => out.push_str(&format!("\n  {:<16} {}", key, value)),
        }
    }
    out
}

fn weather_text(response: &WeatherResponse) -> String {
    let mut out = format!("Date: {}  Hour: {}", response.data, response.hora);
    let fields = [
        ("temperatura_c", response.temperatura_c),
        ("umidade_pct", response.umidade_pct),
        ("chuva_mm", response.chuva_mm),
        ("vento_ms", response.vento_ms),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            out.push_str(&format!("\n  {:<14} {}", key, value));
        }
    }
    out
}

fn options_text(options: &SoilOptions) -> String {
    format!(
        "Points: {}\nDepths: {}",
        options.points.join(", "),
        options.depths.join(", ")
    )
}

fn liming_text(advice: &LimingAdvice) -> String {
    let ph = advice
        .ph
        .map(|ph| ph.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Point {} ({}), pH {}: {}\n{}",
        point_text(&advice.ponto),
        advice.profundidade,
        ph,
        if advice.calagem_recomendada {
            "liming recommended"
        } else {
            "no liming"
        },
        advice.mensagem
    )
}

fn table_line(name: &str, table: &TableSummary) -> String {
    match (&table.error, table.loaded_at) {
        (Some(reason), _) => format!("{:<8} unavailable ({})", name, reason),
        (None, Some(at)) => format!(
            "{:<8} {} rows, loaded {}\n         columns: {}",
            name,
            table.rows,
            at.to_rfc3339(),
            table.columns.join(", ")
        ),
        (None, None) => format!("{:<8} {} rows", name, table.rows),
    }
}

fn summary_text(summary: &DatasetSummary) -> String {
    format!(
        "{}\n{}\nWind column: {}\nDefault depth: {}",
        table_line("Soil", &summary.soil),
        table_line("Weather", &summary.weather),
        if summary.weather_has_wind { "yes" } else { "no" },
        summary.default_depth
    )
}

fn not_found_text(context: &NotFoundContext) -> String {
    match context {
        NotFoundContext::Soil {
            ponto,
            profundidade,
            points_disponiveis,
            profundidades_disponiveis,
        } => format!(
            "No soil analysis for point {} at '{}'.\nAvailable points: {}\nAvailable depths: {}",
            ponto,
            profundidade,
            points_disponiveis.join(", "),
            profundidades_disponiveis.join(", ")
        ),
        NotFoundContext::Weather {
            data,
            hora,
            horas_disponiveis,
            datas_disponiveis,
        } => {
            if horas_disponiveis.is_empty() {
                format!(
                    "No weather observation for {} (date not present).\nDates in the source include: {}",
                    data,
                    datas_disponiveis.join(", ")
                )
            } else {
                format!(
                    "No weather observation for {} at {}.\nHours on that date: {}",
                    data,
                    hora,
                    horas_disponiveis.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn not_found() -> QueryError {
        QueryError::NotFound(NotFoundContext::Soil {
            ponto: "999".to_string(),
            profundidade: "0 a 20 cm".to_string(),
            points_disponiveis: vec!["1".to_string(), "2".to_string()],
            profundidades_disponiveis: vec!["0 a 20 cm".to_string()],
        })
    }

    #[test]
    fn test_status_and_exit_codes() {
        let invalid = QueryError::InvalidInput("hour: not a number".to_string());
        let unavailable = QueryError::Unavailable {
            dataset: TableKind::Weather,
            reason: "timeout".to_string(),
        };
        assert_eq!(http_status(&invalid), 400);
        assert_eq!(http_status(&not_found()), 404);
        assert_eq!(http_status(&unavailable), 503);
        assert_eq!(exit_code(&invalid), 2);
        assert_eq!(exit_code(&not_found()), 3);
        assert_eq!(exit_code(&unavailable), 4);
    }

    #[test]
    fn test_not_found_json_carries_alternatives() {
        let value = error_json(&not_found());
        assert_eq!(value["status"], 404);
        assert_eq!(value["error"], "not_found");
        assert_eq!(value["detail"]["points_disponiveis"], json!(["1", "2"]));
        assert_eq!(value["detail"]["ponto"], "999");
    }

    #[test]
    fn test_soil_text_lists_units() {
        let mut parametros = BTreeMap::new();
        parametros.insert("ph", 5.3);
        let mut unidades = BTreeMap::new();
        unidades.insert("ph", "-");
        let output = CommandOutput::Soil(SoilResponse {
            talhao: "CA01".to_string(),
            ponto: PointValue::Number(1),
            profundidade: "0 a 20 cm".to_string(),
            parametros,
            unidades,
        });

        let text = output.render(OutputFormat::Text);
        assert!(text.contains("Point: 1"));
        assert!(text.contains("ph"));
        assert!(text.contains("5.3"));

        let json = output.to_json();
        assert_eq!(json["parametros"]["ph"], 5.3);
    }

    #[test]
    fn test_weather_text_skips_absent_metrics() {
        let output = CommandOutput::Weather(WeatherResponse {
            data: "01/01/2024".to_string(),
            hora: "0007".to_string(),
            temperatura_c: Some(22.5),
            umidade_pct: None,
            chuva_mm: Some(0.0),
            vento_ms: None,
            unidades: BTreeMap::new(),
        });
        let text = output.to_text();
        assert!(text.contains("Hour: 0007"));
        assert!(text.contains("chuva_mm"));
        assert!(!text.contains("vento_ms"));
    }

    #[test]
    fn test_text_error_for_unknown_date() {
        let err = QueryError::NotFound(NotFoundContext::Weather {
            data: "31/12/1999".to_string(),
            hora: "0007".to_string(),
            horas_disponiveis: Vec::new(),
            datas_disponiveis: vec!["2024/01/01".to_string()],
        });
        let text = render_error(&err, OutputFormat::Text);
        assert!(text.contains("date not present"));
        assert!(text.contains("2024/01/01"));
    }
}
