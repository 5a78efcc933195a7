use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::paths::log_dir_path;

// The TUI owns the terminal, so logs always go to a daily file.
pub fn init_logging(verbose_level: u8) -> Result<WorkerGuard> {
    let default_filter = match verbose_level {
        0 => "popcorn=info",
        1 => "popcorn=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let log_dir = log_dir_path()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "popcorn.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_writer(writer);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(guard)
}
