//! The process-wide, read-only dataset and the query operations served from it.
//!
//! A `Dataset` is built completely (fetch, parse, index) before anything can
//! query it, and is never mutated afterwards. Reloading means building a new
//! one and publishing it through [`DatasetHandle`].

pub mod handle;

pub use handle::DatasetHandle;

use crate::analyzers::SoilAdvisor;
use crate::config::Settings;
use crate::error::{QueryError, QueryResult, Result};
use crate::index::{SoilIndex, WeatherIndex};
use crate::models::{
    LimingAdvice, SoilOptions, SoilRecord, SoilResponse, TableKind, WeatherResponse,
};
use crate::readers::{DataSource, SoilReader, WeatherReader};
use crate::shaping::ResponseShaper;
use crate::utils::constants::DEFAULT_DEPTH;
use crate::utils::progress::ProgressReporter;
use crate::validation::{SoilQuery, WeatherQuery};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Load outcome for one table.
#[derive(Debug, Clone)]
pub enum TableState<T> {
    Ready { table: T, loaded_at: DateTime<Utc> },
    Failed { reason: String },
}

impl<T> TableState<T> {
    fn from_load(kind: TableKind, result: Result<T>, strict: bool) -> Result<Self> {
        match result {
            Ok(table) => Ok(TableState::Ready {
                table,
                loaded_at: Utc::now(),
            }),
            Err(err) if strict => Err(err),
            Err(err) => {
                warn!("{} table failed to load and will be unavailable: {}", kind, err);
                Ok(TableState::Failed {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn get(&self, kind: TableKind) -> QueryResult<&T> {
        match self {
            TableState::Ready { table, .. } => Ok(table),
            TableState::Failed { reason } => Err(QueryError::Unavailable {
                dataset: kind,
                reason: reason.clone(),
            }),
        }
    }

    fn loaded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TableState::Ready { loaded_at, .. } => Some(*loaded_at),
            TableState::Failed { .. } => None,
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            TableState::Ready { .. } => None,
            TableState::Failed { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    /// Value columns found in the source header.
    pub columns: Vec<&'static str>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub soil: TableSummary,
    pub weather: TableSummary,
    pub weather_has_wind: bool,
    pub default_depth: String,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    soil: TableState<SoilIndex>,
    weather: TableState<WeatherIndex>,
    shaper: ResponseShaper,
    default_depth: String,
}

impl Dataset {
    /// Fetch both sources concurrently, parse them in parallel and publish
    /// the result. Blocks (asynchronously) until both tables are settled.
    pub async fn init(settings: &Settings, progress: Option<&ProgressReporter>) -> Result<Self> {
        let timeout = settings.fetch_timeout();
        let soil_source = DataSource::parse(&settings.soil_source);
        let weather_source = DataSource::parse(&settings.weather_source);

        info!(
            "Loading soil data from {} and weather data from {}",
            soil_source.describe(),
            weather_source.describe()
        );
        if let Some(progress) = progress {
            progress.set_message("Fetching soil and weather sources...");
        }

        let (soil_text, weather_text) = tokio::join!(
            soil_source.read_text(timeout),
            weather_source.read_text(timeout)
        );

        if let Some(progress) = progress {
            progress.set_message("Parsing and indexing tables...");
        }

        let (soil, weather) = tokio::task::spawn_blocking(move || {
            rayon::join(
                || soil_text.and_then(|text| build_soil_index(&text)),
                || weather_text.and_then(|text| build_weather_index(&text)),
            )
        })
        .await?;

        let dataset = Self {
            soil: TableState::from_load(TableKind::Soil, soil, settings.strict_startup)?,
            weather: TableState::from_load(TableKind::Weather, weather, settings.strict_startup)?,
            shaper: if settings.include_units {
                ResponseShaper::new()
            } else {
                ResponseShaper::without_units()
            },
            default_depth: settings.default_depth.clone(),
        };

        let summary = dataset.summary();
        info!(
            "Dataset ready: {} soil rows, {} weather rows",
            summary.soil.rows, summary.weather.rows
        );
        Ok(dataset)
    }

    /// Build synchronously from already-fetched text. Either table failing
    /// fails the whole build.
    pub fn from_text(soil_text: &str, weather_text: &str) -> Result<Self> {
        Ok(Self::from_indices(
            build_soil_index(soil_text)?,
            build_weather_index(weather_text)?,
        ))
    }

    pub fn from_indices(soil: SoilIndex, weather: WeatherIndex) -> Self {
        let loaded_at = Utc::now();
        Self {
            soil: TableState::Ready {
                table: soil,
                loaded_at,
            },
            weather: TableState::Ready {
                table: weather,
                loaded_at,
            },
            shaper: ResponseShaper::new(),
            default_depth: DEFAULT_DEPTH.to_string(),
        }
    }

    /// Assemble from per-table load results, honouring `strict`.
    pub fn from_results(
        soil: Result<SoilIndex>,
        weather: Result<WeatherIndex>,
        strict: bool,
    ) -> Result<Self> {
        Ok(Self {
            soil: TableState::from_load(TableKind::Soil, soil, strict)?,
            weather: TableState::from_load(TableKind::Weather, weather, strict)?,
            shaper: ResponseShaper::new(),
            default_depth: DEFAULT_DEPTH.to_string(),
        })
    }

    pub fn with_default_depth(mut self, depth: impl Into<String>) -> Self {
        self.default_depth = depth.into();
        self
    }

    pub fn default_depth(&self) -> &str {
        &self.default_depth
    }

    pub fn soil(&self) -> QueryResult<&SoilIndex> {
        self.soil.get(TableKind::Soil)
    }

    pub fn weather(&self) -> QueryResult<&WeatherIndex> {
        self.weather.get(TableKind::Weather)
    }

    /// Soil analysis for an integer point; `depth` defaults to the
    /// configured depth band.
    pub fn query_soil(&self, point: i64, depth: Option<&str>) -> QueryResult<SoilResponse> {
        self.query_soil_raw(&point.to_string(), depth)
    }

    /// As [`Dataset::query_soil`], for a point still in textual form.
    pub fn query_soil_raw(&self, point: &str, depth: Option<&str>) -> QueryResult<SoilResponse> {
        let record = self.find_soil(point, depth)?;
        Ok(self.shaper.shape_soil(record))
    }

    pub fn query_weather(&self, date: &str, hour: &str) -> QueryResult<WeatherResponse> {
        let query = WeatherQuery::new(date, hour).checked()?;
        let record = self.weather()?.find(&query.date, &query.hour)?;
        Ok(self.shaper.shape_weather(record))
    }

    pub fn list_soil_options(&self) -> QueryResult<SoilOptions> {
        Ok(self.soil()?.options())
    }

    pub fn recommend_liming(&self, point: i64, depth: Option<&str>) -> QueryResult<LimingAdvice> {
        self.recommend_liming_raw(&point.to_string(), depth)
    }

    pub fn recommend_liming_raw(
        &self,
        point: &str,
        depth: Option<&str>,
    ) -> QueryResult<LimingAdvice> {
        let record = self.find_soil(point, depth)?;
        Ok(SoilAdvisor::new().advise(record))
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            soil: TableSummary {
                rows: self.soil().map(SoilIndex::len).unwrap_or(0),
                columns: self
                    .soil()
                    .map(|index| index.parameters().iter().map(|p| p.display_name()).collect())
                    .unwrap_or_default(),
                loaded_at: self.soil.loaded_at(),
                error: self.soil.failure().map(str::to_string),
            },
            weather: TableSummary {
                rows: self.weather().map(WeatherIndex::len).unwrap_or(0),
                columns: self
                    .weather()
                    .map(|index| index.metrics().iter().map(|m| m.display_name()).collect())
                    .unwrap_or_default(),
                loaded_at: self.weather.loaded_at(),
                error: self.weather.failure().map(str::to_string),
            },
            weather_has_wind: self.weather().map(WeatherIndex::has_wind).unwrap_or(false),
            default_depth: self.default_depth.clone(),
        }
    }

    fn find_soil(&self, point: &str, depth: Option<&str>) -> QueryResult<&SoilRecord> {
        let depth = depth.unwrap_or(&self.default_depth);
        let query = SoilQuery::new(point, depth).checked()?;
        self.soil()?.find(&query.point, &query.depth)
    }
}

fn build_soil_index(text: &str) -> Result<SoilIndex> {
    SoilReader::new().read_str(text).map(SoilIndex::build)
}

fn build_weather_index(text: &str) -> Result<WeatherIndex> {
    WeatherReader::new().read_str(text).map(WeatherIndex::build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use pretty_assertions::assert_eq;

    const SOIL_CSV: &str = "\
Talhão;Ponto;Profundidade;pH;MO;K
CA01;1;0 a 20 cm;5,3;32,1;0
CA01;1;20 a 40 cm;4,9;;0,15
CA01;2;0 a 20 cm;;28,0;0,2
";

    const WEATHER_CSV: &str = "\
Data;Hora (UTC);Temp. Ins. (C);Umi. Ins. (%);Chuva (mm);Vel. Vento (m/s)
01/01/2024;0007;22,5;81;0,0;1,8
01/01/2024;1200;30,2;55;0,0;3,1
";

    fn dataset() -> Dataset {
        Dataset::from_text(SOIL_CSV, WEATHER_CSV).unwrap()
    }

    #[test]
    fn test_query_soil_default_depth() {
        let response = dataset().query_soil(1, None).unwrap();
        assert_eq!(response.profundidade, "0 a 20 cm");
        assert_eq!(response.parametros.get("ph"), Some(&5.3));
        assert_eq!(response.parametros.get("potassio"), Some(&0.0));
    }

    #[test]
    fn test_query_soil_is_idempotent() {
        let dataset = dataset();
        let first = serde_json::to_string(&dataset.query_soil(1, Some("20 a 40 cm")).unwrap()).unwrap();
        let second = serde_json::to_string(&dataset.query_soil(1, Some("20 a 40 cm")).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_soil_raw_invalid_point() {
        assert!(matches!(
            dataset().query_soil_raw("um", None),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_query_weather() {
        let dataset = dataset();
        let response = dataset.query_weather("01/01/2024", "7").unwrap();
        assert_eq!(response.hora, "0007");
        assert_eq!(response.vento_ms, Some(1.8));
        assert!(matches!(
            dataset.query_weather("01/01/2024", "abc"),
            Err(QueryError::InvalidInput(_))
        ));
        assert!(matches!(
            dataset.query_weather("01/01/2024", "8"),
            Err(QueryError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_soil_options() {
        let options = dataset().list_soil_options().unwrap();
        assert_eq!(options.points, vec!["1", "2"]);
        assert_eq!(options.depths, vec!["0 a 20 cm", "20 a 40 cm"]);
    }

    #[test]
    fn test_recommend_liming() {
        let dataset = dataset();
        assert!(dataset.recommend_liming(1, Some("20 a 40 cm")).unwrap().calagem_recomendada);
        assert_eq!(dataset.recommend_liming(2, None).unwrap().ph, None);
        assert!(matches!(
            dataset.recommend_liming(9, None),
            Err(QueryError::NotFound(_))
        ));
    }

    #[test]
    fn test_lenient_startup_marks_table_unavailable() {
        let weather = WeatherReader::new()
            .read_str("Data;Hora\n01/01/2024;7h\n")
            .map(WeatherIndex::build);
        let soil = build_soil_index(SOIL_CSV);

        let dataset = Dataset::from_results(soil, weather, false).unwrap();
        assert!(dataset.query_soil(1, None).is_ok());
        match dataset.query_weather("01/01/2024", "7") {
            Err(QueryError::Unavailable { dataset, .. }) => assert_eq!(dataset, TableKind::Weather),
            other => panic!("expected Unavailable, got {:?}", other),
        }

        let summary = dataset.summary();
        assert_eq!(summary.weather.rows, 0);
        assert!(summary.weather.error.is_some());
        assert!(summary.weather.loaded_at.is_none());
        assert_eq!(summary.soil.rows, 3);
    }

    #[test]
    fn test_strict_startup_propagates_load_error() {
        let weather = WeatherReader::new()
            .read_str("Data\n01/01/2024\n")
            .map(WeatherIndex::build);
        let result = Dataset::from_results(build_soil_index(SOIL_CSV), weather, true);
        assert!(matches!(result, Err(LoadError::MissingColumn { .. })));
    }

    #[test]
    fn test_loaded_but_empty_is_not_unavailable() {
        let dataset = Dataset::from_text("Ponto;Profundidade\n", WEATHER_CSV).unwrap();
        assert_eq!(dataset.list_soil_options().unwrap().points.len(), 0);
        assert!(matches!(
            dataset.query_soil(1, None),
            Err(QueryError::NotFound(_))
        ));
    }

    #[test]
    fn test_listed_points_are_queryable() {
        let soil = "Ponto;Profundidade;pH\n99999999999999999999;0 a 20 cm;5,0\n";
        let dataset = Dataset::from_text(soil, WEATHER_CSV).unwrap();
        for point in dataset.list_soil_options().unwrap().points {
            let response = dataset.query_soil_raw(&point, None).unwrap();
            assert_eq!(response.parametros.get("ph"), Some(&5.0));
        }
    }

    #[test]
    fn test_summary_lists_columns() {
        let summary = dataset().summary();
        assert_eq!(summary.soil.columns, vec!["pH", "Organic matter", "Potassium"]);
        assert_eq!(
            summary.weather.columns,
            vec!["Temperature", "Humidity", "Rainfall", "Wind Speed"]
        );
    }

    #[test]
    fn test_custom_default_depth() {
        let dataset = dataset().with_default_depth("20 a 40 cm");
        assert_eq!(dataset.query_soil(1, None).unwrap().parametros.get("ph"), Some(&4.9));
    }

    #[tokio::test]
    async fn test_init_from_files() {
        use std::io::Write;
        let mut soil = tempfile::NamedTempFile::new().unwrap();
        soil.write_all(SOIL_CSV.as_bytes()).unwrap();
        let mut weather = tempfile::NamedTempFile::new().unwrap();
        weather.write_all(WEATHER_CSV.as_bytes()).unwrap();

        let settings = Settings {
            soil_source: soil.path().display().to_string(),
            weather_source: weather.path().display().to_string(),
            ..Settings::default()
        };
        let dataset = Dataset::init(&settings, None).await.unwrap();
        assert_eq!(dataset.summary().soil.rows, 3);
        assert!(dataset.summary().weather_has_wind);
        assert!(!dataset.query_soil(1, None).unwrap().unidades.is_empty());

        let settings = Settings {
            include_units: false,
            ..settings
        };
        let dataset = Dataset::init(&settings, None).await.unwrap();
        assert!(dataset.query_soil(1, None).unwrap().unidades.is_empty());
        assert!(dataset.query_weather("01/01/2024", "7").unwrap().unidades.is_empty());
    }

    #[tokio::test]
    async fn test_init_strict_missing_file_fails() {
        let settings = Settings {
            soil_source: "/nonexistent/agro-query/soil.csv".to_string(),
            weather_source: "/nonexistent/agro-query/weather.csv".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            Dataset::init(&settings, None).await,
            Err(LoadError::Io(_))
        ));
    }
}
