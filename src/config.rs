//! Runtime settings: built-in defaults, then an optional TOML file, then
//! `AGRO_QUERY_*` environment variables. Command-line flags are applied last
//! by the caller.

use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE, DEFAULT_DEPTH, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SOIL_SOURCE,
    DEFAULT_WEATHER_SOURCE, ENV_PREFIX,
};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub soil_source: String,

    #[validate(length(min = 1))]
    pub weather_source: String,

    #[validate(length(min = 1))]
    pub default_depth: String,

    #[validate(range(min = 1, max = 600))]
    pub fetch_timeout_secs: u64,

    /// Abort startup when either table fails to load. When false the failed
    /// table is reported as unavailable and the other one keeps serving.
    pub strict_startup: bool,

    /// Attach a `unidades` map to soil and weather responses.
    pub include_units: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            soil_source: DEFAULT_SOIL_SOURCE.to_string(),
            weather_source: DEFAULT_WEATHER_SOURCE.to_string(),
            default_depth: DEFAULT_DEPTH.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            strict_startup: true,
            include_units: true,
        }
    }
}

impl Settings {
    /// Load layered settings. An explicit `path` must exist; otherwise
    /// `agro-query.toml` in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(PathBuf::from(path))
                .format(FileFormat::Toml)
                .required(true),
            None => File::new(CONFIG_FILE.trim_end_matches(".toml"), FileFormat::Toml)
                .required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("soil_source", DEFAULT_SOIL_SOURCE)?
            .set_default("weather_source", DEFAULT_WEATHER_SOURCE)?
            .set_default("default_depth", DEFAULT_DEPTH)?
            .set_default("fetch_timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS as i64)?
            .set_default("strict_startup", true)?
            .set_default("include_units", true)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_overrides(
        mut self,
        soil_source: Option<String>,
        weather_source: Option<String>,
        default_depth: Option<String>,
    ) -> Result<Self> {
        if let Some(source) = soil_source {
            self.soil_source = source;
        }
        if let Some(source) = weather_source {
            self.weather_source = source;
        }
        if let Some(depth) = default_depth {
            self.default_depth = depth;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.default_depth, "0 a 20 cm");
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "soil_source = \"data/CA01.csv\"")?;
        writeln!(file, "fetch_timeout_secs = 5")?;
        writeln!(file, "strict_startup = false")?;
        writeln!(file, "include_units = false")?;

        let settings = Settings::load(Some(file.path()))?;
        assert_eq!(settings.soil_source, "data/CA01.csv");
        assert_eq!(settings.weather_source, DEFAULT_WEATHER_SOURCE);
        assert_eq!(settings.fetch_timeout_secs, 5);
        assert!(!settings.strict_startup);
        assert!(!settings.include_units);
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/agro-query.toml")));
        assert!(matches!(result, Err(LoadError::Config(_))));
    }

    #[test]
    fn test_overrides_are_validated() {
        let settings = Settings::default()
            .with_overrides(Some("soil.csv".to_string()), None, None)
            .unwrap();
        assert_eq!(settings.soil_source, "soil.csv");

        let result = Settings::default().with_overrides(None, None, Some(String::new()));
        assert!(matches!(result, Err(LoadError::InvalidSettings(_))));
    }
}
