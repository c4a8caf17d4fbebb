//! Meta-exchange execution service
//!
//! # Architecture
//! - **core**: Fixed-point numbers and venue snapshot types
//! - **hot_path**: Liquidity ranking and constrained allocation
//! - **snapshots**: Exchange snapshot loading (JSON files)
//! - **engine**: Request orchestration
//! - **infrastructure**: Cold path (logging, metrics, config, api)

use anyhow::Context;
use meta_exchange::infrastructure::{config::Config, logging, metrics::MetricsCollector, start_server};
use meta_exchange::snapshots::{DirectorySource, SnapshotSource};
use meta_exchange::{log_engine, ExecutionService};
use std::sync::Arc;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    // Guards flush the file appenders on drop
    let _guards = logging::init_logging(&config.logging.directory, &config.logging.level)
        .context("failed to initialize logging")?;

    tracing::info!("Starting meta-exchange execution service...");

    let source = DirectorySource::new(config.snapshots.directory.clone());

    // Snapshots are re-read per request; this only reports what is there now
    match source.load() {
        Ok(venues) => log_engine!(
            Level::INFO,
            "Found {} exchange snapshots in {}",
            venues.len(),
            source.describe()
        ),
        Err(e) => log_engine!(
            Level::WARN,
            "Snapshots not readable yet ({}); requests will fail until fixed",
            e
        ),
    }

    let metrics = Arc::new(MetricsCollector::new());
    let service = ExecutionService::new(Arc::new(source), metrics);

    start_server(service, &config.api)
        .await
        .context("API server failed")?;

    Ok(())
}
