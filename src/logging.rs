//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once the session starts.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "TYPK_LOG";
const DEFAULT_FILTER: &str = "typk=info,warn";

/// Logs go to `<data_local_dir>/typk/logs/typk.log`, rotated daily.
/// The filter comes from `TYPK_LOG`, e.g. `TYPK_LOG=debug typk run`.
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "typk.log");
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "typk starting");
    Ok(log_dir)
}

pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typk")
        .join("logs")
}
