pub mod normalize;
pub mod soil_reader;
pub mod source;
pub mod table;
pub mod weather_reader;

pub use soil_reader::{load_soil, SoilReader, SoilTable};
pub use source::DataSource;
pub use table::{DelimitedTable, SourceRow};
pub use weather_reader::{load_weather, WeatherReader, WeatherTable};
