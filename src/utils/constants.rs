/// Default published sources
pub const DEFAULT_SOIL_SOURCE: &str = "https://inova.ggailabs.com/dados/CA01.csv";
pub const DEFAULT_WEATHER_SOURCE: &str = "https://inova.ggailabs.com/dados/dados.csv";

/// Depth band assumed when a soil query does not name one
pub const DEFAULT_DEPTH: &str = "0 a 20 cm";

/// Source format
pub const FIELD_DELIMITER: u8 = b';';
pub const QUOTE_CHARS: [char; 2] = ['"', '\''];

/// Soil key column aliases (normalized form)
pub const SOIL_PLOT_COLUMNS: &[&str] = &["talhão", "talhao", "talhao_id", "plot", "plot_id"];
pub const SOIL_POINT_COLUMNS: &[&str] = &["ponto", "point", "pt"];
pub const SOIL_DEPTH_COLUMNS: &[&str] = &["profundidade", "prof", "prof.", "depth"];

/// Weather key column aliases (normalized form)
pub const WEATHER_DATE_COLUMNS: &[&str] = &["data", "date"];
pub const WEATHER_HOUR_COLUMNS: &[&str] = &["hora (utc)", "hora", "hour"];

/// Canonical hour width ("7" -> "0007")
pub const HOUR_WIDTH: usize = 4;
pub const MAX_HOUR_VALUE: u32 = 9999;

/// Dates echoed back when a weather query names an unknown date
pub const DATE_SAMPLE_LIMIT: usize = 20;

/// Liming threshold
pub const LIMING_PH_THRESHOLD: f64 = 5.5;

/// Fetching
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("agro-query/", env!("CARGO_PKG_VERSION"));

/// Configuration
pub const CONFIG_FILE: &str = "agro-query.toml";
pub const ENV_PREFIX: &str = "AGRO_QUERY";
