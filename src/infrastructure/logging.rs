//! Centralized file-based logging system
//!
//! Writes logs under the configured directory, separated by log type:
//! - main/ - General application logs (JSON)
//! - error/ - Error and warning logs only
//! - api/ - API server logs
//! - engine/ - Plan computation and snapshot logs

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log subdirectories, one per file appender
pub const LOG_TYPES: [&str; 4] = ["main", "error", "api", "engine"];

/// Initialize centralized file logging
///
/// Creates the log directory tree and sets up file appenders for each log type.
/// `level` is the default filter when `RUST_LOG` is unset.
/// Returns WorkerGuards which must be kept alive for the duration of the program.
pub fn init_logging(logs_dir: &Path, level: &str) -> std::io::Result<Vec<WorkerGuard>> {
    create_log_dirs(logs_dir)?;

    let mut guards = Vec::with_capacity(LOG_TYPES.len());

    // Main log - all logs
    let (main_appender, main_guard) = create_appender(logs_dir, "main");
    guards.push(main_guard);

    // Error log - ERROR and WARN only
    let (error_appender, error_guard) = create_appender(logs_dir, "error");
    guards.push(error_guard);

    // API log - HTTP server logs
    let (api_appender, api_guard) = create_appender(logs_dir, "api");
    guards.push(api_guard);

    // Engine log - plan computation and snapshot loading
    let (engine_appender, engine_guard) = create_appender(logs_dir, "engine");
    guards.push(engine_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let api_layer = tracing_subscriber::fmt::layer()
        .with_writer(api_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            is_api_target(metadata.target())
        }));

    let engine_layer = tracing_subscriber::fmt::layer()
        .with_writer(engine_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            is_engine_target(metadata.target())
        }));

    // Console layer for development
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .with(error_layer)
        .with(api_layer)
        .with(engine_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging system initialized. Log files in {}", logs_dir.display());

    Ok(guards)
}

fn create_log_dirs(logs_dir: &Path) -> std::io::Result<()> {
    for log_type in LOG_TYPES {
        fs::create_dir_all(logs_dir.join(log_type))?;
    }
    Ok(())
}

fn is_api_target(target: &str) -> bool {
    target.contains("api") || target.contains("server")
}

fn is_engine_target(target: &str) -> bool {
    target.contains("engine")
        || target.contains("snapshot")
        || target.contains("hot_path")
}

/// Create a daily rolling file appender
fn create_appender(logs_dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, logs_dir.join(name), name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_api {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "api", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_engine {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "engine", $level, $($arg)+)
    };
}
