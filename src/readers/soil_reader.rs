use crate::error::Result;
use crate::models::{SoilParameter, SoilRecord, TableKind};
use crate::readers::normalize::{canonical_depth, canonical_point, parse_decimal};
use crate::readers::table::DelimitedTable;
use crate::utils::constants::{SOIL_DEPTH_COLUMNS, SOIL_PLOT_COLUMNS, SOIL_POINT_COLUMNS};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Normalized soil table, in source row order.
#[derive(Debug, Clone, Default)]
pub struct SoilTable {
    pub records: Vec<SoilRecord>,
    /// Parameter columns present in the source.
    pub parameters: Vec<SoilParameter>,
    /// Non-empty cells that did not coerce to a number, per parameter.
    pub unparsed_cells: BTreeMap<SoilParameter, usize>,
}

impl SoilTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct SoilReader {
    default_plot: String,
}

impl SoilReader {
    pub fn new() -> Self {
        Self {
            default_plot: String::new(),
        }
    }

    /// Plot label used when the source has no plot column.
    pub fn with_default_plot(default_plot: impl Into<String>) -> Self {
        Self {
            default_plot: default_plot.into(),
        }
    }

    pub fn read_str(&self, text: &str) -> Result<SoilTable> {
        let table = DelimitedTable::parse(text, TableKind::Soil)?;

        let point_col = table.require_column(SOIL_POINT_COLUMNS, "Ponto")?;
        let depth_col = table.require_column(SOIL_DEPTH_COLUMNS, "Profundidade")?;
        let plot_col = table.find_column(SOIL_PLOT_COLUMNS);

        let parameter_cols: Vec<(SoilParameter, usize)> = SoilParameter::ALL
            .iter()
            .filter_map(|p| table.find_column(p.column_aliases()).map(|c| (*p, c)))
            .collect();

        let mut records = Vec::with_capacity(table.rows().len());
        let mut unparsed_cells: BTreeMap<SoilParameter, usize> = BTreeMap::new();

        for row in table.rows() {
            let point = canonical_point(row.cell(point_col))
                .map_err(|_| table.malformed(row, "Ponto", row.cell(point_col)))?;
            let depth = canonical_depth(row.cell(depth_col))
                .map_err(|_| table.malformed(row, "Profundidade", row.cell(depth_col)))?;
            let plot_id = match row.optional_cell(plot_col) {
                "" => self.default_plot.clone(),
                plot => plot.to_string(),
            };

            let mut record = SoilRecord::new(plot_id, point, depth);
            for (parameter, column) in &parameter_cols {
                let cell = row.cell(*column);
                let value = parse_decimal(cell);
                if value.is_none() && !cell.is_empty() {
                    *unparsed_cells.entry(*parameter).or_default() += 1;
                }
                record.parameters.insert(*parameter, value);
            }
            records.push(record);
        }

        for (parameter, count) in &unparsed_cells {
            debug!(
                "Soil column {}: {} cells could not be read as numbers and are treated as missing",
                parameter.display_name(),
                count
            );
        }
        info!(
            "Loaded {} soil records with {} parameter columns",
            records.len(),
            parameter_cols.len()
        );

        Ok(SoilTable {
            records,
            parameters: parameter_cols.into_iter().map(|(p, _)| p).collect(),
            unparsed_cells,
        })
    }
}

impl Default for SoilReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a soil document that has already been fetched.
pub fn load_soil(text: &str) -> Result<SoilTable> {
    SoilReader::new().read_str(text)
}
