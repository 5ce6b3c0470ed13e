use crate::cli::args::{Cli, Commands};
use crate::cli::render::{self, CommandOutput, EXIT_LOAD_FAILURE};
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::error::{QueryResult, Result};
use crate::utils::progress::ProgressReporter;
use std::process::ExitCode;
use tracing::{debug, error};

pub async fn run(cli: Cli) -> ExitCode {
    setup_logging(cli.verbose, cli.quiet);

    let dataset = match load_dataset(&cli).await {
        Ok(dataset) => dataset,
        Err(err) => {
            error!("Startup failed: {}", err);
            println!("{}", render::render_load_error(&err, cli.format));
            return ExitCode::from(EXIT_LOAD_FAILURE);
        }
    };

    match execute(&dataset, &cli.command) {
        Ok(output) => {
            println!("{}", output.render(cli.format));
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("Query rejected: {}", err);
            println!("{}", render::render_error(&err, cli.format));
            ExitCode::from(render::exit_code(&err))
        }
    }
}

/// Route one parsed command to the matching dataset operation.
pub fn execute(dataset: &Dataset, command: &Commands) -> QueryResult<CommandOutput> {
    match command {
        Commands::Soil { point, depth } => dataset
            .query_soil_raw(point, depth.as_deref())
            .map(CommandOutput::Soil),
        Commands::Weather { date, hour } => dataset
            .query_weather(date, hour)
            .map(CommandOutput::Weather),
        Commands::Options => dataset.list_soil_options().map(CommandOutput::Options),
        Commands::Liming { point, depth } => dataset
            .recommend_liming_raw(point, depth.as_deref())
            .map(CommandOutput::Liming),
        Commands::Summary => Ok(CommandOutput::Summary(dataset.summary())),
    }
}

async fn load_dataset(cli: &Cli) -> Result<Dataset> {
    let settings = Settings::load(cli.config.as_deref())?.with_overrides(
        cli.soil_source.clone(),
        cli.weather_source.clone(),
        cli.default_depth.clone(),
    )?;
    debug!("Effective settings: {:?}", settings);

    let progress = ProgressReporter::new_spinner("Loading data...", cli.quiet);
    let dataset = Dataset::init(&settings, Some(&progress)).await;
    progress.finish_and_clear();
    dataset
}

fn setup_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agro_query={}", level)));

    // Already installed when run() is called more than once in a process.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}
