use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherMetric {
    Temperature,
    Humidity,
    Rainfall,
    WindSpeed,
}

impl WeatherMetric {
    pub const ALL: [WeatherMetric; 4] = [
        WeatherMetric::Temperature,
        WeatherMetric::Humidity,
        WeatherMetric::Rainfall,
        WeatherMetric::WindSpeed,
    ];

    pub fn column_aliases(&self) -> &'static [&'static str] {
        match self {
            WeatherMetric::Temperature => &["temp. ins. (c)", "temperatura", "temp (c)"],
            WeatherMetric::Humidity => &["umi. ins. (%)", "umidade", "umidade (%)"],
            WeatherMetric::Rainfall => &["chuva (mm)", "chuva", "precipitacao (mm)"],
            WeatherMetric::WindSpeed => &["vel. vento (m/s)", "vento (m/s)", "velocidade do vento"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeatherMetric::Temperature => "Temperature",
            WeatherMetric::Humidity => "Humidity",
            WeatherMetric::Rainfall => "Rainfall",
            WeatherMetric::WindSpeed => "Wind Speed",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            WeatherMetric::Temperature => "°C",
            WeatherMetric::Humidity => "%",
            WeatherMetric::Rainfall => "mm",
            WeatherMetric::WindSpeed => "m/s",
        }
    }
}

/// One observation. `date` is kept exactly as the source spells it and
/// `hour` is the canonical four-digit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: String,
    pub hour: String,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

impl WeatherRecord {
    pub fn new(date: String, hour: String) -> Self {
        Self {
            date,
            hour,
            temperature_c: None,
            humidity_pct: None,
            rainfall_mm: None,
            wind_speed_ms: None,
        }
    }

    pub fn metric(&self, metric: WeatherMetric) -> Option<f64> {
        match metric {
            WeatherMetric::Temperature => self.temperature_c,
            WeatherMetric::Humidity => self.humidity_pct,
            WeatherMetric::Rainfall => self.rainfall_mm,
            WeatherMetric::WindSpeed => self.wind_speed_ms,
        }
    }

    pub fn set_metric(&mut self, metric: WeatherMetric, value: Option<f64>) {
        match metric {
            WeatherMetric::Temperature => self.temperature_c = value,
            WeatherMetric::Humidity => self.humidity_pct = value,
            WeatherMetric::Rainfall => self.rainfall_mm = value,
            WeatherMetric::WindSpeed => self.wind_speed_ms = value,
        }
    }

    pub fn available_metrics(&self) -> Vec<WeatherMetric> {
        WeatherMetric::ALL
            .into_iter()
            .filter(|m| self.metric(*m).is_some())
            .collect()
    }
}
