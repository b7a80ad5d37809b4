//! Console and daily-rolling file output for `tracing`.

use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, TranslatorError};

pub const LOG_FILE_NAME: &str = "transcript-translator.log";

/// Where log files are written for a process started in `base`
pub fn log_dir(base: &Path) -> PathBuf {
    base.join(".transcript-translator").join("log")
}

/// INFO (DEBUG when `verbose`) refined by `RUST_LOG`-style `directives`
pub fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let base = if verbose { "debug" } else { "info" };
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(extra) => EnvFilter::new(format!("{},{}", base, extra)),
        None => EnvFilter::new(base),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive until exit.
pub fn init(verbose: bool, base: &Path) -> Result<WorkerGuard> {
    let dir = log_dir(base);
    std::fs::create_dir_all(&dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, LOG_FILE_NAME));
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(build_filter(verbose, directives.as_deref()))
        .with(fmt::layer().with_target(false).with_line_number(true))
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| TranslatorError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Writing logs to {}", dir.join(LOG_FILE_NAME).display());
    Ok(guard)
}
