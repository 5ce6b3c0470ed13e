use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agro-query")]
#[command(about = "Query soil-analysis and weather observation tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Settings file (TOML) [default: ./agro-query.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Soil source: file path or http(s) URL")]
    pub soil_source: Option<String>,

    #[arg(long, global = true, help = "Weather source: file path or http(s) URL")]
    pub weather_source: Option<String>,

    #[arg(long, global = true, help = "Depth band used when a soil query names none")]
    pub default_depth: Option<String>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Soil analysis for a sampling point and depth band
    Soil {
        #[arg(short, long, allow_hyphen_values = true)]
        point: String,

        #[arg(short, long)]
        depth: Option<String>,
    },

    /// Weather observation for a date and hour
    Weather {
        #[arg(short, long, help = "Date exactly as written in the source (e.g. 01/01/2024)")]
        date: String,

        #[arg(long, help = "Hour, padded or not (7, 07 and 0007 are the same)")]
        hour: String,
    },

    /// Points and depth bands present in the soil table
    Options,

    /// Basic liming recommendation from soil pH
    Liming {
        #[arg(short, long, allow_hyphen_values = true)]
        point: String,

        #[arg(short, long)]
        depth: Option<String>,
    },

    /// Row counts and load status of both tables
    Summary,
}
