pub mod analyzers;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod models;
pub mod readers;
pub mod shaping;
pub mod utils;
pub mod validation;

pub use config::Settings;
pub use dataset::{Dataset, DatasetHandle};
pub use error::{LoadError, NotFoundContext, QueryError, QueryResult, Result};
pub use readers::{load_soil, load_weather};
