use std::process::ExitCode;

use clap::Parser;

use pd_cli::{Cli, Config, FAILURE_EXIT, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(&cli),
        Err(err) => {
            logging::init(cli.verbose, None);
            tracing::error!("failed to load configuration: {err}");
            return ExitCode::from(FAILURE_EXIT);
        }
    };

    logging::init(cli.verbose, config.log_file.as_deref());
    tracing::debug!(?config, "loaded configuration");

    match pd_cli::run(&cli, &config) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(FAILURE_EXIT)
        }
    }
}
