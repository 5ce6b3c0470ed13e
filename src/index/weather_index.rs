use crate::error::{NotFoundContext, QueryError, QueryResult};
use crate::models::{WeatherMetric, WeatherRecord};
use crate::readers::normalize::{canonical_date, canonical_hour};
use crate::readers::WeatherTable;
use crate::utils::constants::DATE_SAMPLE_LIMIT;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// Point lookup over a loaded weather table, keyed by (date, hour).
///
/// Dates are matched as exact strings: the caller must use the source's
/// date format. No calendar parsing is attempted.
#[derive(Debug, Clone, Default)]
pub struct WeatherIndex {
    records: Vec<WeatherRecord>,
    by_key: HashMap<(String, String), usize>,
    hours_by_date: BTreeMap<String, BTreeSet<String>>,
    metrics: Vec<WeatherMetric>,
    duplicate_keys: usize,
}

impl WeatherIndex {
    pub fn build(table: WeatherTable) -> Self {
        let mut by_key = HashMap::with_capacity(table.records.len());
        let mut hours_by_date: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut duplicate_keys = 0;

        for (position, record) in table.records.iter().enumerate() {
            let key = (record.date.clone(), record.hour.clone());
            if by_key.contains_key(&key) {
                duplicate_keys += 1;
            } else {
                by_key.insert(key, position);
            }
            hours_by_date
                .entry(record.date.clone())
                .or_default()
                .insert(record.hour.clone());
        }

        if duplicate_keys > 0 {
            warn!(
                "Weather table has {} duplicate (date, hour) rows; the first occurrence of each is served",
                duplicate_keys
            );
        }

        Self {
            records: table.records,
            by_key,
            hours_by_date,
            metrics: table.metrics,
            duplicate_keys,
        }
    }

    pub fn find(&self, date: &str, hour: &str) -> QueryResult<&WeatherRecord> {
        let date_key = canonical_date(date)
            .map_err(|e| QueryError::InvalidInput(format!("date: {}", e)))?;
        let hour_key = canonical_hour(hour).map_err(|e| {
            QueryError::InvalidInput(format!("hour '{}': {}", hour.trim(), e))
        })?;

        match self.by_key.get(&(date_key.clone(), hour_key.clone())) {
            Some(&position) => Ok(&self.records[position]),
            None => {
                let hours = self.hours_for(&date_key);
                let dates = if hours.is_empty() {
                    self.dates()
                        .take(DATE_SAMPLE_LIMIT)
                        .map(str::to_string)
                        .collect()
                } else {
                    Vec::new()
                };
                Err(QueryError::NotFound(NotFoundContext::Weather {
                    horas_disponiveis: hours,
                    datas_disponiveis: dates,
                    data: date_key,
                    hora: hour_key,
                }))
            }
        }
    }

    /// Canonical hours recorded for a date, ascending.
    pub fn hours_for(&self, date: &str) -> Vec<String> {
        self.hours_by_date
            .get(date.trim())
            .map(|hours| hours.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Distinct dates, in string order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.hours_by_date.keys().map(String::as_str)
    }

    pub fn metrics(&self) -> &[WeatherMetric] {
        &self.metrics
    }

    pub fn has_wind(&self) -> bool {
        self.metrics.contains(&WeatherMetric::WindSpeed)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}
