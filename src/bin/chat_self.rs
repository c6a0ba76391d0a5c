use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::io;
use std::process::ExitCode;

use persona::agent::CommandAgent;
use persona::cli::ChatCli;
use persona::config::Config;
use persona::error::diagnostic;
use persona::{commands, logging};

fn try_main() -> Result<()> {
    let cli = ChatCli::parse();

    let config = Config::load(cli.config.as_ref(), cli.root.as_ref()).context("Failed to load configuration")?;

    // No log file means no logging for this run, not a failed command
    let _ = logging::setup_logging(&config.log_level);

    info!("Starting chat-self with config from: {:?}", cli.config);
    info!("Root: {}", config.root().display());

    let agent = CommandAgent::from_config(&config.agent);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let exchange = commands::chat::run(&cli.message, &config, &agent, &mut stdin.lock(), &mut stdout.lock())?;

    info!("Exchange recorded at {}", exchange.timestamp);
    Ok(())
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
