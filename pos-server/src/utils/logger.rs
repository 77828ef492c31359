//! Logging Infrastructure
//!
//! stdout always; a daily rolling file as well when a log directory is set.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info,pos_server=debug";

/// Initialize the logger with stdout only
pub fn init_logger() {
    let _ = init_logger_with_file(None);
}

/// Initialize the logger with optional file output.
///
/// `RUST_LOG` overrides the default filter. The returned guard flushes the
/// file writer on drop and must be held for the lifetime of the process.
pub fn init_logger_with_file(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "pos-server.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_ansi(false).with_writer(writer);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Cannot create log dir {}: {}", dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    guard
}
