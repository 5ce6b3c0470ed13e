pub mod soil_advisor;

pub use soil_advisor::SoilAdvisor;
