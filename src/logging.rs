use std::path::Path;

use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::Config;

pub const LOG_FILE_PREFIX: &str = "app.log";

/// Installs the global subscriber writing to a daily rolling file under
/// `config.log_dir`. Keep the guard alive for as long as logs should flush.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    init_with(&config.log_dir, config.log_level)
}

pub fn init_with(log_dir: &Path, level: tracing::Level) -> Result<WorkerGuard> {
    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::info!(dir = %log_dir.display(), "Logging initialised");
    Ok(guard)
}
