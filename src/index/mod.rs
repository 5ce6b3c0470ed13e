pub mod soil_index;
pub mod weather_index;

pub use soil_index::SoilIndex;
pub use weather_index::WeatherIndex;
