use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stdout logging always; a daily-rolling file layer when ENABLE_FILE_LOGS
/// is set. The returned guard keeps the file writer flushing and must stay
/// alive for the whole process.
pub fn init_tracing(log_level: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true));

    match file_writer() {
        Some((writer, guard)) => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

fn file_writer() -> Option<(NonBlocking, WorkerGuard)> {
    let enabled = std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if !enabled {
        return None;
    }

    let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create log directory {dir}: {err}");
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &dir, "survey.log");
    Some(tracing_appender::non_blocking(appender))
}
