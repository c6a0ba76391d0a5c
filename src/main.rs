use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use log::info;
use std::process::ExitCode;

use persona::cli::{Cli, Commands};
use persona::config::Config;
use persona::error::diagnostic;
use persona::{commands, logging};

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Some(Commands::Status { format }) => commands::status::run(format, &config),
        Some(Commands::History { count }) => commands::history::run(count, &config),
        Some(Commands::Completions { shell }) => commands::completions::run(shell),
        None => {
            Cli::command().print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref(), cli.root.as_ref()).context("Failed to load configuration")?;

    // No log file means no logging for this run, not a failed command
    let _ = logging::setup_logging(&config.log_level);

    info!("Starting persona with config from: {:?}", cli.config);
    info!("Root: {}", config.root().display());

    run(cli, config)
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:?}", e);
            eprintln!("{}", diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}
