use crate::error::Result;
use crate::models::{TableKind, WeatherMetric, WeatherRecord};
use crate::readers::normalize::{canonical_date, canonical_hour, parse_decimal};
use crate::readers::table::DelimitedTable;
use crate::utils::constants::{WEATHER_DATE_COLUMNS, WEATHER_HOUR_COLUMNS};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Normalized weather table, in source row order.
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    pub records: Vec<WeatherRecord>,
    /// Metric columns present in the source.
    pub metrics: Vec<WeatherMetric>,
    pub unparsed_cells: BTreeMap<&'static str, usize>,
}

impl WeatherTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_wind(&self) -> bool {
        self.metrics.contains(&WeatherMetric::WindSpeed)
    }
}

pub struct WeatherReader;

impl WeatherReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_str(&self, text: &str) -> Result<WeatherTable> {
        let table = DelimitedTable::parse(text, TableKind::Weather)?;

        let date_col = table.require_column(WEATHER_DATE_COLUMNS, "Data")?;
        let hour_col = table.require_column(WEATHER_HOUR_COLUMNS, "Hora (UTC)")?;

        let metric_cols: Vec<(WeatherMetric, usize)> = WeatherMetric::ALL
            .iter()
            .filter_map(|m| table.find_column(m.column_aliases()).map(|c| (*m, c)))
            .collect();

        let mut records = Vec::with_capacity(table.rows().len());
        let mut unparsed_cells: BTreeMap<&'static str, usize> = BTreeMap::new();

        for row in table.rows() {
            let date = canonical_date(row.cell(date_col))
                .map_err(|_| table.malformed(row, "Data", row.cell(date_col)))?;
            // The hour is a lookup key: a non-numeric hour fails the load
            // instead of degrading to a missing value.
            let hour = canonical_hour(row.cell(hour_col))
                .map_err(|_| table.malformed(row, "Hora (UTC)", row.cell(hour_col)))?;

            let mut record = WeatherRecord::new(date, hour);
            for (metric, column) in &metric_cols {
                let cell = row.cell(*column);
                let value = parse_decimal(cell);
                if value.is_none() && !cell.is_empty() {
                    *unparsed_cells.entry(metric.display_name()).or_default() += 1;
                }
                record.set_metric(*metric, value);
            }
            records.push(record);
        }

        for (metric, count) in &unparsed_cells {
            debug!(
                "Weather column {}: {} cells could not be read as numbers and are treated as missing",
                metric, count
            );
        }
        info!(
            "Loaded {} weather records ({} metric columns)",
            records.len(),
            metric_cols.len()
        );

        Ok(WeatherTable {
            records,
            metrics: metric_cols.into_iter().map(|(m, _)| m).collect(),
            unparsed_cells,
        })
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a weather document that has already been fetched.
pub fn load_weather(text: &str) -> Result<WeatherTable> {
    WeatherReader::new().read_str(text)
}
