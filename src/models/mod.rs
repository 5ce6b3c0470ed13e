pub mod response;
pub mod soil;
pub mod weather;

pub use response::{LimingAdvice, PointValue, SoilOptions, SoilResponse, WeatherResponse};
pub use soil::{SoilParameter, SoilRecord};
pub use weather::{WeatherMetric, WeatherRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independently loaded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Soil,
    Weather,
}

impl TableKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TableKind::Soil => "Soil",
            TableKind::Weather => "Weather",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
