use crate::models::{
    SoilParameter, SoilRecord, SoilResponse, WeatherMetric, WeatherRecord, WeatherResponse,
};
use crate::models::response::PointValue;
use std::collections::BTreeMap;

/// Turns matched records into caller-facing responses.
///
/// Absent readings are omitted; present readings (zero included) are always
/// emitted. Units are attached only for what is emitted.
#[derive(Debug, Clone)]
pub struct ResponseShaper {
    include_units: bool,
}

impl ResponseShaper {
    pub fn new() -> Self {
        Self {
            include_units: true,
        }
    }

    pub fn without_units() -> Self {
        Self {
            include_units: false,
        }
    }

    pub fn shape_soil(&self, record: &SoilRecord) -> SoilResponse {
        let mut parametros = BTreeMap::new();
        let mut unidades = BTreeMap::new();

        for (parameter, value) in record.present_parameters() {
            parametros.insert(parameter.key(), value);
            if self.include_units {
                unidades.insert(parameter.key(), parameter.units());
            }
        }

        SoilResponse {
            talhao: record.plot_id.clone(),
            ponto: PointValue::from(record.point.as_str()),
            profundidade: record.depth.clone(),
            parametros,
            unidades,
        }
    }

    pub fn shape_weather(&self, record: &WeatherRecord) -> WeatherResponse {
        let mut unidades = BTreeMap::new();
        if self.include_units {
            for metric in record.available_metrics() {
                unidades.insert(weather_key(metric), metric.units());
            }
        }

        WeatherResponse {
            data: record.date.clone(),
            hora: record.hour.clone(),
            temperatura_c: record.temperature_c,
            umidade_pct: record.humidity_pct,
            chuva_mm: record.rainfall_mm,
            vento_ms: record.wind_speed_ms,
            unidades,
        }
    }

    /// Full units table for every parameter the soil source can carry.
    pub fn soil_units() -> BTreeMap<&'static str, &'static str> {
        SoilParameter::ALL
            .iter()
            .map(|p| (p.key(), p.units()))
            .collect()
    }
}

impl Default for ResponseShaper {
    fn default() -> Self {
        Self::new()
    }
}

fn weather_key(metric: WeatherMetric) -> &'static str {
    match metric {
        WeatherMetric::Temperature => "temperatura_c",
        WeatherMetric::Humidity => "umidade_pct",
        WeatherMetric::Rainfall => "chuva_mm",
        WeatherMetric::WindSpeed => "vento_ms",
    }
}
