use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Laboratory parameters reported by a soil analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilParameter {
    Ph,
    OrganicMatter,
    Phosphorus,
    Potassium,
    Calcium,
    Magnesium,
    Cec,
    BaseSaturation,
    Sulfur,
    Boron,
    PotassiumCecPct,
    CalciumCecPct,
    MagnesiumCecPct,
    Clay,
}

impl SoilParameter {
    pub const ALL: [SoilParameter; 14] = [
        SoilParameter::Ph,
        SoilParameter::OrganicMatter,
        SoilParameter::Phosphorus,
        SoilParameter::Potassium,
        SoilParameter::Calcium,
        SoilParameter::Magnesium,
        SoilParameter::Cec,
        SoilParameter::BaseSaturation,
        SoilParameter::Sulfur,
        SoilParameter::Boron,
        SoilParameter::PotassiumCecPct,
        SoilParameter::CalciumCecPct,
        SoilParameter::MagnesiumCecPct,
        SoilParameter::Clay,
    ];

    /// Header spellings accepted for this parameter, already in normalized
    /// (lowercase, single-spaced) form.
    pub fn column_aliases(&self) -> &'static [&'static str] {
        match self {
            SoilParameter::Ph => &["ph", "ph cacl2", "ph h2o", "ph (cacl2)", "ph (h2o)"],
            SoilParameter::OrganicMatter => &["mo", "m.o.", "m.o", "materia organica", "matéria orgânica"],
            SoilParameter::Phosphorus => &["p", "p mehlich", "p (mehlich)", "p resina"],
            SoilParameter::Potassium => &["k"],
            SoilParameter::Calcium => &["ca"],
            SoilParameter::Magnesium => &["mg"],
            SoilParameter::Cec => &["ctc", "t", "ctc ph7", "ctc (t)"],
            SoilParameter::BaseSaturation => &["v", "v%", "v (%)"],
            SoilParameter::Sulfur => &["s", "s-so4"],
            SoilParameter::Boron => &["b"],
            SoilParameter::PotassiumCecPct => &["k/ctc", "k%", "k (%)", "k na ctc"],
            SoilParameter::CalciumCecPct => &["ca/ctc", "ca%", "ca (%)", "ca na ctc"],
            SoilParameter::MagnesiumCecPct => &["mg/ctc", "mg%", "mg (%)", "mg na ctc"],
            SoilParameter::Clay => &["argila", "argila (%)", "clay"],
        }
    }

    /// Field name in caller-facing output.
    pub fn key(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "ph",
            SoilParameter::OrganicMatter => "materia_organica",
            SoilParameter::Phosphorus => "fosforo",
            SoilParameter::Potassium => "potassio",
            SoilParameter::Calcium => "calcio",
            SoilParameter::Magnesium => "magnesio",
            SoilParameter::Cec => "ctc",
            SoilParameter::BaseSaturation => "saturacao_bases",
            SoilParameter::Sulfur => "enxofre",
            SoilParameter::Boron => "boro",
            SoilParameter::PotassiumCecPct => "k_ctc",
            SoilParameter::CalciumCecPct => "ca_ctc",
            SoilParameter::MagnesiumCecPct => "mg_ctc",
            SoilParameter::Clay => "argila",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "-",
            SoilParameter::OrganicMatter => "g/dm³",
            SoilParameter::Phosphorus | SoilParameter::Sulfur | SoilParameter::Boron => "mg/dm³",
            SoilParameter::Potassium
            | SoilParameter::Calcium
            | SoilParameter::Magnesium
            | SoilParameter::Cec => "cmolc/dm³",
            SoilParameter::BaseSaturation
            | SoilParameter::PotassiumCecPct
            | SoilParameter::CalciumCecPct
            | SoilParameter::MagnesiumCecPct
            | SoilParameter::Clay => "%",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SoilParameter::Ph => "pH",
            SoilParameter::OrganicMatter => "Organic matter",
            SoilParameter::Phosphorus => "Phosphorus",
            SoilParameter::Potassium => "Potassium",
            SoilParameter::Calcium => "Calcium",
            SoilParameter::Magnesium => "Magnesium",
            SoilParameter::Cec => "Cation-exchange capacity",
            SoilParameter::BaseSaturation => "Base saturation",
            SoilParameter::Sulfur => "Sulfur",
            SoilParameter::Boron => "Boron",
            SoilParameter::PotassiumCecPct => "K (% of CEC)",
            SoilParameter::CalciumCecPct => "Ca (% of CEC)",
            SoilParameter::MagnesiumCecPct => "Mg (% of CEC)",
            SoilParameter::Clay => "Clay",
        }
    }
}

/// One (point, depth) analysis for a plot.
///
/// `parameters` holds an entry for every parameter column present in the
/// source; the value is `None` when that row's cell was blank or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    pub plot_id: String,
    pub point: String,
    pub depth: String,
    pub parameters: BTreeMap<SoilParameter, Option<f64>>,
}

impl SoilRecord {
    pub fn new(plot_id: String, point: String, depth: String) -> Self {
        Self {
            plot_id,
            point,
            depth,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: SoilParameter, value: Option<f64>) -> Self {
        self.parameters.insert(parameter, value);
        self
    }

    pub fn get(&self, parameter: SoilParameter) -> Option<f64> {
        self.parameters.get(&parameter).copied().flatten()
    }

    /// Parameters with an actual reading, in declaration order.
    pub fn present_parameters(&self) -> impl Iterator<Item = (SoilParameter, f64)> + '_ {
        self.parameters
            .iter()
            .filter_map(|(parameter, value)| value.map(|v| (*parameter, v)))
    }

    pub fn missing_count(&self) -> usize {
        self.parameters.values().filter(|v| v.is_none()).count()
    }
}
