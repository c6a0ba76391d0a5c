use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::config::LogLevel;

/// Where log output goes: `<data dir>/persona/logs/persona.log`
pub fn log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("persona")
        .join("logs")
        .join("persona.log")
}

/// Initialize env_logger writing to the log file
///
/// Stdout and stderr belong to the command, so nothing is logged there.
/// Callers treat failure as "no logging for this run".
pub fn setup_logging(log_level: &LogLevel) -> Result<()> {
    let log_file = log_file();
    if let Some(log_dir) = log_file.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder
        .target(env_logger::Target::Pipe(target))
        .try_init()
        .context("Failed to install logger")?;

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}
