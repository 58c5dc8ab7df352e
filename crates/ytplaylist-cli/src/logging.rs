use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    prelude::*,
    EnvFilter,
};

/// `[2024-05-01 12:00:00]`, local time
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Log to stdout at the requested verbosity and append errors to `log_file`
/// in `log_dir`. Keep the guard alive until exit so the file gets flushed.
pub fn init(verbose: u8, log_dir: &Path, log_file: &str) -> WorkerGuard {
    let filter = match verbose {
        0 => "ytplaylist=info,ytplaylist_core=info",
        1 => "ytplaylist=debug,ytplaylist_core=debug",
        _ => "trace",
    };

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(LocalTimestamp)
                .with_writer(std::io::stdout)
                .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_timer(LocalTimestamp)
                .with_writer(file_writer)
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    guard
}
