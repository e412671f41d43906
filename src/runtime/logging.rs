use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MUSICVERSE_LOG";

/// Send logs to a file; the terminal belongs to the UI. Returns the guard
/// that flushes the writer, or `None` when no log file could be set up.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let path = settings.file.clone().or_else(default_log_path)?;
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    fs::create_dir_all(dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .ok()?;

    Some(guard)
}
