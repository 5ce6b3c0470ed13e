//! Caller-facing shapes. Field names follow the vocabulary of the published
//! spreadsheets so that tool-call and REST consumers see the same keys.

use serde::Serialize;
use std::collections::BTreeMap;

/// A point identifier as emitted: numeric when it is an integer, text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PointValue {
    Number(i64),
    Text(String),
}

impl From<&str> for PointValue {
    fn from(point: &str) -> Self {
        match point.parse::<i64>() {
            Ok(n) => PointValue::Number(n),
            Err(_) => PointValue::Text(point.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilResponse {
    pub talhao: String,
    pub ponto: PointValue,
    pub profundidade: String,
    pub parametros: BTreeMap<&'static str, f64>,
    pub unidades: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResponse {
    pub data: String,
    pub hora: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperatura_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub umidade_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chuva_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vento_ms: Option<f64>,
    pub unidades: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoilOptions {
    #[serde(rename = "points_disponiveis")]
    pub points: Vec<String>,
    #[serde(rename = "profundidades_disponiveis")]
    pub depths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimingAdvice {
    pub talhao: String,
    pub ponto: PointValue,
    pub profundidade: String,
    pub ph: Option<f64>,
    pub calagem_recomendada: bool,
    pub mensagem: String,
}
